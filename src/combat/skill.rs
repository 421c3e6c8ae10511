//! Skills: a flat base value plus a number of coins, each adding its value
//! on heads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::ClashError;

/// Damage type, selects which resistance multiplier applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Slash,
    Pierce,
    Bash,
}

impl DamageType {
    pub const ALL: [DamageType; 3] = [DamageType::Slash, DamageType::Pierce, DamageType::Bash];

    pub fn label(self) -> &'static str {
        match self {
            DamageType::Slash => "SLASH",
            DamageType::Pierce => "PIERCE",
            DamageType::Bash => "BASH",
        }
    }
}

impl FromStr for DamageType {
    type Err = ClashError;

    /// Case-insensitive: "slash", "Pierce", "BASH"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SLASH" => Ok(DamageType::Slash),
            "PIERCE" => Ok(DamageType::Pierce),
            "BASH" => Ok(DamageType::Bash),
            _ => Err(ClashError::MalformedSkillType(s.to_string())),
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable skill parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub base_value: i32,
    pub coin_count: u32,
    pub coin_value: i32,
    pub damage_type: DamageType,
}

impl Skill {
    pub fn new(base_value: i32, coin_count: u32, coin_value: i32, damage_type: DamageType) -> Self {
        Self {
            base_value,
            coin_count,
            coin_value,
            damage_type,
        }
    }

    /// Build from a textual damage type label, as found in roster files
    pub fn parse(
        base_value: i32,
        coin_count: u32,
        coin_value: i32,
        damage_type: &str,
    ) -> Result<Self, ClashError> {
        Ok(Self::new(base_value, coin_count, coin_value, damage_type.parse()?))
    }

    /// Value when `heads` of the flipped coins land heads
    pub fn value_with_heads(&self, heads: u32) -> i32 {
        self.base_value + heads as i32 * self.coin_value
    }

    /// Highest value the skill can roll
    pub fn max_value(&self) -> i32 {
        self.value_with_heads(self.coin_count)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{}*{}, Type: {}",
            self.base_value, self.coin_value, self.coin_count, self.damage_type
        )
    }
}

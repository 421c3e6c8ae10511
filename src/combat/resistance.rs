//! Per-damage-type incoming damage multipliers

use serde::{Deserialize, Serialize};

use crate::combat::skill::DamageType;
use crate::core::error::{ClashError, Result};

/// Damage multipliers (1.0 = neutral, 2.0 = weak, 0.5 = resistant)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resistance {
    pub slash: f64,
    pub pierce: f64,
    pub bash: f64,
}

impl Resistance {
    /// Fails on negative or NaN multipliers
    pub fn new(slash: f64, pierce: f64, bash: f64) -> Result<Self> {
        let resistance = Self {
            slash,
            pierce,
            bash,
        };
        resistance.validate()?;
        Ok(resistance)
    }

    /// Same multiplier for every damage type
    pub fn uniform(multiplier: f64) -> Self {
        Self {
            slash: multiplier,
            pierce: multiplier,
            bash: multiplier,
        }
    }

    pub fn of(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Slash => self.slash,
            DamageType::Pierce => self.pierce,
            DamageType::Bash => self.bash,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for damage_type in DamageType::ALL {
            let multiplier = self.of(damage_type);
            if multiplier.is_nan() || multiplier < 0.0 {
                return Err(ClashError::InvalidRoster(format!(
                    "{} resistance must be non-negative, got {}",
                    damage_type, multiplier
                )));
            }
        }
        Ok(())
    }
}

impl Default for Resistance {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

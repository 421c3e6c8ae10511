//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Act counter (one full turn: tick, declare, resolve)
pub type Act = u32;

/// One of the two sides in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionId {
    First,
    Second,
}

impl FactionId {
    pub const BOTH: [FactionId; 2] = [FactionId::First, FactionId::Second];

    /// Position of this faction in a two-element array
    pub fn index(self) -> usize {
        match self {
            FactionId::First => 0,
            FactionId::Second => 1,
        }
    }

    pub fn opponent(self) -> FactionId {
        match self {
            FactionId::First => FactionId::Second,
            FactionId::Second => FactionId::First,
        }
    }
}

/// Positional identity of a combatant: its faction and its slot within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantRef {
    pub faction: FactionId,
    pub slot: usize,
}

impl CombatantRef {
    pub fn new(faction: FactionId, slot: usize) -> Self {
        Self { faction, slot }
    }
}

/// One of a combatant's three skill slots, numbered 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillSlot(u8);

impl SkillSlot {
    pub const COUNT: usize = 3;

    /// Returns None outside 1..=3
    pub fn new(number: u8) -> Option<Self> {
        (1..=Self::COUNT as u8).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index into a skill loadout
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for SkillSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

//! Engine configuration with documented defaults
//!
//! Every rule constant the resolver consults lives here so a match can be
//! tuned from TOML without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::combat::constants::{
    BASE_HEAD_CHANCE, DEATH_TIMER, MAX_CLASH_ROUNDS, OFFERED_SKILLS, SANITY_RESTORE_BASE,
    SKILL_BAG, STAGGER_DAMAGE_MULTIPLIER, STAGGER_TIMER,
};
use crate::core::error::{ClashError, Result};
use crate::core::types::SkillSlot;

/// Configuration for the combat engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Head chance (out of 100) at zero sanity
    ///
    /// Sanity is added on top without clamping, so sanity >= 100 - base
    /// always lands heads and sanity <= -base always lands tails.
    pub base_head_chance: i32,

    /// Damage multiplier applied to a staggered target, ignoring resistance
    pub stagger_multiplier: f64,

    /// Acts a combatant stays dead
    pub death_timer: u8,

    /// Acts a combatant stays staggered
    pub stagger_timer: u8,

    /// Clash winner gains `sanity_restore_base + rounds` sanity
    pub sanity_restore_base: i32,

    /// Rounds after which an undecided clash ends with no follow-up attack
    pub max_clash_rounds: u32,

    /// Skill numbers shuffled into each combatant's cycle at creation
    pub skill_bag: Vec<u8>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_head_chance: BASE_HEAD_CHANCE,
            stagger_multiplier: STAGGER_DAMAGE_MULTIPLIER,
            death_timer: DEATH_TIMER,
            stagger_timer: STAGGER_TIMER,
            sanity_restore_base: SANITY_RESTORE_BASE,
            max_clash_rounds: MAX_CLASH_ROUNDS,
            skill_bag: SKILL_BAG.to_vec(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.death_timer == 0 || self.stagger_timer == 0 {
            return Err(ClashError::InvalidConfig(
                "death_timer and stagger_timer must be at least 1".into(),
            ));
        }

        if self.stagger_multiplier.is_nan() || self.stagger_multiplier < 0.0 {
            return Err(ClashError::InvalidConfig(format!(
                "stagger_multiplier ({}) must be non-negative",
                self.stagger_multiplier
            )));
        }

        if self.max_clash_rounds == 0 {
            return Err(ClashError::InvalidConfig(
                "max_clash_rounds must be at least 1".into(),
            ));
        }

        // Offered skills come from the front of the bag
        if self.skill_bag.len() < OFFERED_SKILLS {
            return Err(ClashError::InvalidConfig(format!(
                "skill_bag needs at least {} entries, got {}",
                OFFERED_SKILLS,
                self.skill_bag.len()
            )));
        }

        if let Some(bad) = self.skill_bag.iter().find(|&&n| SkillSlot::new(n).is_none()) {
            return Err(ClashError::InvalidConfig(format!(
                "skill_bag entry {} is not a skill slot (1..=3)",
                bad
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_head_chance, 50);
        assert_eq!(config.stagger_multiplier, 2.0);
        assert_eq!(config.death_timer, 3);
        assert_eq!(config.stagger_timer, 2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("death_timer = 5\n").unwrap();
        assert_eq!(config.death_timer, 5);
        assert_eq!(config.stagger_timer, 2);
        assert_eq!(config.skill_bag, vec![1, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_rejects_zero_timer() {
        let result = EngineConfig::from_toml_str("stagger_timer = 0\n");
        assert!(matches!(result, Err(ClashError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bag_shorter_than_offer() {
        let result = EngineConfig::from_toml_str("skill_bag = [1]\n");
        assert!(matches!(result, Err(ClashError::InvalidConfig(_))));
        assert!(EngineConfig::from_toml_str("skill_bag = [3, 1]\n").is_ok());
    }

    #[test]
    fn test_rejects_bad_skill_bag() {
        let result = EngineConfig::from_toml_str("skill_bag = [1, 4]\n");
        assert!(matches!(result, Err(ClashError::InvalidConfig(_))));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = EngineConfig::from_toml_str(include_str!("../../data/engine.toml")).unwrap();
        assert_eq!(shipped, EngineConfig::default());
    }
}

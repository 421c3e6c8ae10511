//! Roster table loaded from TOML
//!
//! The roster lists the draftable characters (numbered from 1 in file
//! order) and the objective every faction defends. It is only consulted
//! when building combatants.

use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::combat::combatant::{Combatant, CombatantKind, CombatantStats, SkillCycle};
use crate::combat::resistance::Resistance;
use crate::combat::skill::Skill;
use crate::core::config::EngineConfig;
use crate::core::error::{ClashError, InvalidSelection, Result};

/// Roster shipped with the game
pub const BUILTIN_ROSTER: &str = include_str!("../../data/roster.toml");

#[derive(Debug, Deserialize)]
struct RosterFile {
    objective: RosterEntry,
    entries: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
struct RosterEntry {
    name: String,
    max_hp: i32,
    max_stagger: i32,
    #[serde(default)]
    sanity: i32,
    speed_min: i32,
    speed_max: i32,
    resistance: Resistance,
    skills: Vec<SkillEntry>,
}

#[derive(Debug, Deserialize)]
struct SkillEntry {
    base: i32,
    coins: u32,
    coin_value: i32,
    /// Damage type label, checked when the roster is built
    kind: String,
}

impl RosterEntry {
    fn into_stats(self) -> Result<CombatantStats> {
        let skills = self
            .skills
            .iter()
            .map(|s| Skill::parse(s.base, s.coins, s.coin_value, &s.kind))
            .collect::<Result<Vec<_>>>()?;
        let skills: [Skill; 3] = skills.try_into().map_err(|found: Vec<Skill>| {
            ClashError::InvalidRoster(format!(
                "{} has {} skills, expected 3",
                self.name,
                found.len()
            ))
        })?;

        let stats = CombatantStats {
            name: self.name,
            max_hp: self.max_hp,
            max_stagger: self.max_stagger,
            sanity: self.sanity,
            speed_min: self.speed_min,
            speed_max: self.speed_max,
            resistance: self.resistance,
            skills,
        };
        stats.validate()?;
        Ok(stats)
    }
}

/// Validated roster table
#[derive(Debug, Clone)]
pub struct Roster {
    objective: CombatantStats,
    entries: Vec<CombatantStats>,
}

impl Roster {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RosterFile = toml::from_str(content)?;
        let objective = file.objective.into_stats()?;
        let entries = file
            .entries
            .into_iter()
            .map(RosterEntry::into_stats)
            .collect::<Result<Vec<_>>>()?;

        if entries.is_empty() {
            return Err(ClashError::InvalidRoster("roster has no entries".into()));
        }
        Ok(Self { objective, entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_ROSTER)
    }

    /// Number of draftable entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by its 1-based roster number
    pub fn get(&self, number: usize) -> std::result::Result<&CombatantStats, InvalidSelection> {
        number
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .ok_or(InvalidSelection::UnknownRosterEntry(number))
    }

    pub fn objective(&self) -> &CombatantStats {
        &self.objective
    }

    /// `(number, stats)` pairs in roster order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CombatantStats)> {
        self.entries.iter().enumerate().map(|(i, s)| (i + 1, s))
    }

    /// Build a fresh combatant for roster entry `number`
    pub fn instantiate(
        &self,
        number: usize,
        config: &EngineConfig,
        rng: &mut impl Rng,
    ) -> Result<Combatant> {
        let stats = self.get(number)?.clone();
        build(stats, CombatantKind::Regular, config, rng)
    }

    pub fn instantiate_objective(
        &self,
        config: &EngineConfig,
        rng: &mut impl Rng,
    ) -> Result<Combatant> {
        build(self.objective.clone(), CombatantKind::Objective, config, rng)
    }
}

fn build(
    stats: CombatantStats,
    kind: CombatantKind,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Result<Combatant> {
    let cycle = SkillCycle::shuffled(&config.skill_bag, rng)?;
    Ok(Combatant::new(stats, kind, cycle)?.with_config(config))
}

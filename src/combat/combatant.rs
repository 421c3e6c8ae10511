//! Combatant state and its per-act state machine
//!
//! A combatant is Active, Staggered or Dead. Stagger and death run on two
//! independent timers: both can start from the same hit, and each recovers
//! on its own schedule.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::action::{Mode, ModeChooser};
use crate::combat::constants::OFFERED_SKILLS;
use crate::combat::resistance::Resistance;
use crate::combat::skill::{DamageType, Skill};
use crate::core::config::EngineConfig;
use crate::core::error::{ClashError, Result};
use crate::core::types::SkillSlot;

/// Regular combatants act and can be clashed. The objective never acts,
/// never moves off speed 0, and its death ends the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    Regular,
    Objective,
}

/// Coarse turn state, derived from the vitals and timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Active,
    /// Acts left until the stagger pool refills
    Staggered(u8),
    /// Acts left until revival; takes precedence over stagger
    Dead(u8),
}

/// The stat bundle a combatant is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantStats {
    pub name: String,
    pub max_hp: i32,
    pub max_stagger: i32,
    pub sanity: i32,
    pub speed_min: i32,
    pub speed_max: i32,
    pub resistance: Resistance,
    pub skills: [Skill; 3],
}

impl CombatantStats {
    pub fn validate(&self) -> Result<()> {
        if self.max_hp <= 0 || self.max_stagger <= 0 {
            return Err(ClashError::InvalidRoster(format!(
                "{}: max_hp and max_stagger must be positive",
                self.name
            )));
        }
        if self.speed_min > self.speed_max {
            return Err(ClashError::InvalidRoster(format!(
                "{}: speed_min ({}) exceeds speed_max ({})",
                self.name, self.speed_min, self.speed_max
            )));
        }
        self.resistance.validate()
    }
}

/// Fixed skill rotation drawn once at creation
///
/// Only the first `OFFERED_SKILLS` entries are ever offered. The bag is not
/// reshuffled between acts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCycle {
    order: Vec<SkillSlot>,
}

impl SkillCycle {
    /// Shuffle a bag of skill numbers (e.g. `[1, 1, 1, 2, 2, 3]`)
    pub fn shuffled(bag: &[u8], rng: &mut impl Rng) -> Result<Self> {
        let mut order = bag
            .iter()
            .map(|&n| {
                SkillSlot::new(n).ok_or_else(|| {
                    ClashError::InvalidConfig(format!("skill bag entry {} is not 1..=3", n))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        order.shuffle(rng);
        Self::from_order(order)
    }

    /// Use an explicit order; needs at least `OFFERED_SKILLS` entries
    pub fn from_order(order: Vec<SkillSlot>) -> Result<Self> {
        if order.len() < OFFERED_SKILLS {
            return Err(ClashError::InvalidConfig(format!(
                "skill cycle needs at least {} entries, got {}",
                OFFERED_SKILLS,
                order.len()
            )));
        }
        Ok(Self { order })
    }

    /// The skill slots selectable this act
    pub fn offered(&self) -> [SkillSlot; OFFERED_SKILLS] {
        std::array::from_fn(|i| self.order[i])
    }

    pub fn order(&self) -> &[SkillSlot] {
        &self.order
    }
}

/// Rule values a combatant needs to update itself
#[derive(Debug, Clone, Copy, PartialEq)]
struct CombatantRules {
    death_timer: u8,
    stagger_timer: u8,
    stagger_multiplier: f64,
}

impl From<&EngineConfig> for CombatantRules {
    fn from(config: &EngineConfig) -> Self {
        Self {
            death_timer: config.death_timer,
            stagger_timer: config.stagger_timer,
            stagger_multiplier: config.stagger_multiplier,
        }
    }
}

/// What a single damage application did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub amount: i32,
    pub hp_after: i32,
    pub stagger_after: i32,
    /// Entered stagger with this hit
    pub staggered: bool,
    /// Died with this hit
    pub died: bool,
}

/// Recoveries that happened during a turn-start tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub revived: bool,
    pub recovered_stagger: bool,
}

#[derive(Debug, Clone)]
pub struct Combatant {
    name: String,
    kind: CombatantKind,
    max_hp: i32,
    cur_hp: i32,
    max_stagger: i32,
    cur_stagger: i32,
    sanity: i32,
    speed_min: i32,
    speed_max: i32,
    speed: i32,
    resistance: Resistance,
    skills: [Skill; 3],
    cycle: SkillCycle,
    death_timer: u8,
    stagger_timer: u8,
    rules: CombatantRules,
}

impl Combatant {
    /// Fresh combatant at full vitals with default rules
    ///
    /// Refuses a stat bundle that fails `CombatantStats::validate`.
    pub fn new(stats: CombatantStats, kind: CombatantKind, cycle: SkillCycle) -> Result<Self> {
        stats.validate()?;
        let rules = CombatantRules::from(&EngineConfig::default());
        Ok(Self {
            name: stats.name,
            kind,
            max_hp: stats.max_hp,
            cur_hp: stats.max_hp,
            max_stagger: stats.max_stagger,
            cur_stagger: stats.max_stagger,
            sanity: stats.sanity,
            speed_min: stats.speed_min,
            speed_max: stats.speed_max,
            speed: 0,
            resistance: stats.resistance,
            skills: stats.skills,
            cycle,
            death_timer: 0,
            stagger_timer: 0,
            rules,
        })
    }

    /// Take timer lengths and the stagger multiplier from `config`
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.rules = CombatantRules::from(config);
        self
    }

    // === Read accessors ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CombatantKind {
        self.kind
    }

    pub fn is_objective(&self) -> bool {
        self.kind == CombatantKind::Objective
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn hp(&self) -> i32 {
        self.cur_hp
    }

    pub fn max_stagger(&self) -> i32 {
        self.max_stagger
    }

    pub fn stagger(&self) -> i32 {
        self.cur_stagger
    }

    pub fn sanity(&self) -> i32 {
        self.sanity
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn speed_range(&self) -> (i32, i32) {
        (self.speed_min, self.speed_max)
    }

    pub fn death_timer(&self) -> u8 {
        self.death_timer
    }

    pub fn stagger_timer(&self) -> u8 {
        self.stagger_timer
    }

    pub fn resistance(&self) -> &Resistance {
        &self.resistance
    }

    pub fn skill(&self, slot: SkillSlot) -> &Skill {
        &self.skills[slot.index()]
    }

    pub fn skills(&self) -> &[Skill; 3] {
        &self.skills
    }

    pub fn skill_cycle(&self) -> &SkillCycle {
        &self.cycle
    }

    /// Skill slots selectable this act
    pub fn offered_skills(&self) -> [SkillSlot; OFFERED_SKILLS] {
        self.cycle.offered()
    }

    pub fn is_alive(&self) -> bool {
        self.cur_hp > 0
    }

    pub fn is_staggered(&self) -> bool {
        self.cur_stagger < 1
    }

    pub fn turn_state(&self) -> TurnState {
        if !self.is_alive() {
            TurnState::Dead(self.death_timer)
        } else if self.is_staggered() {
            TurnState::Staggered(self.stagger_timer)
        } else {
            TurnState::Active
        }
    }

    // === State transitions ===

    /// Start-of-act update: roll speed, then advance both recovery timers
    pub fn tick_turn_start(&mut self, rng: &mut impl Rng) -> TickReport {
        let mut report = TickReport::default();

        if self.kind == CombatantKind::Regular {
            self.speed = rng.gen_range(self.speed_min..=self.speed_max);
        }

        if self.death_timer > 0 {
            self.death_timer -= 1;
            if self.death_timer == 0 {
                self.cur_hp = self.max_hp;
                report.revived = true;
                tracing::info!("{} revives", self.name);
            }
        }

        if self.stagger_timer > 0 {
            self.stagger_timer -= 1;
            if self.stagger_timer == 0 {
                self.cur_stagger = self.max_stagger;
                report.recovered_stagger = true;
                tracing::info!("{} recovers from stagger", self.name);
            }
        }

        report
    }

    /// Subtract `amount` from health and, unless already empty, from stagger
    ///
    /// Any hit that leaves a pool at zero (re)starts its timer.
    pub fn apply_damage(&mut self, amount: i32) -> DamageReport {
        let was_alive = self.is_alive();
        let was_staggered = self.is_staggered();

        self.cur_hp = self.cur_hp.saturating_sub(amount).min(self.max_hp);
        if self.cur_stagger != 0 {
            self.cur_stagger = self.cur_stagger.saturating_sub(amount).min(self.max_stagger);
        }

        if self.cur_stagger <= 0 {
            self.cur_stagger = 0;
            self.stagger_timer = self.rules.stagger_timer;
        }
        if self.cur_hp <= 0 {
            self.cur_hp = 0;
            self.death_timer = self.rules.death_timer;
        }

        let staggered = !was_staggered && self.is_staggered();
        let died = was_alive && !self.is_alive();
        if staggered {
            tracing::info!("{} is staggered", self.name);
        }
        if died {
            tracing::info!("{} is dead", self.name);
        }

        DamageReport {
            amount,
            hp_after: self.cur_hp,
            stagger_after: self.cur_stagger,
            staggered,
            died,
        }
    }

    /// Incoming damage multiplier; a fixed factor while staggered
    pub fn multiplier_for(&self, damage_type: DamageType) -> f64 {
        if self.is_staggered() {
            return self.rules.stagger_multiplier;
        }
        self.resistance.of(damage_type)
    }

    /// Head chance out of 100; unclamped
    pub fn head_chance(&self, base_head_chance: i32) -> i32 {
        base_head_chance + self.sanity
    }

    pub(crate) fn restore_sanity(&mut self, amount: i32) {
        self.sanity += amount;
    }

    // === Declaration ===

    /// Whether targeting `defender` leaves a clash-or-one-sided choice open
    ///
    /// The objective can't be clashed, a staggered target can't answer,
    /// and only a strictly faster attacker may force a clash.
    pub fn may_clash(&self, defender: &Combatant) -> bool {
        !defender.is_objective() && self.speed > defender.speed && !defender.is_staggered()
    }

    /// Decide the action mode for targeting `defender` with `skill`
    ///
    /// `chooser` is consulted only when a clash is actually on offer.
    pub fn declare_targeting<C: ModeChooser + ?Sized>(
        &self,
        defender: &Combatant,
        skill: SkillSlot,
        chooser: &mut C,
    ) -> Mode {
        tracing::debug!(
            "{} targets {} with skill {} at speed {}",
            self.name,
            defender.name,
            skill,
            self.speed
        );
        if !self.may_clash(defender) {
            return Mode::OneSided;
        }
        chooser.choose_mode(self, defender)
    }

    /// Short form for target lists
    pub fn summary(&self) -> String {
        if !self.is_alive() {
            return format!("{} is dead (Timer: {} turns)", self.name, self.death_timer);
        }
        if self.is_objective() {
            return format!("{} (Health: {})", self.name, self.cur_hp);
        }
        if self.is_staggered() {
            return format!("{} is staggered", self.name);
        }
        format!("{} (Speed: {})", self.name, self.speed)
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_objective() {
            return write!(f, "{} (Health: {}/{})", self.name, self.cur_hp, self.max_hp);
        }
        if !self.is_alive() {
            return write!(
                f,
                "{} will revive in {} acts. (Health: 0/{}) (Stagger: 0/{})",
                self.name, self.death_timer, self.max_hp, self.max_stagger
            );
        }
        if self.is_staggered() {
            return write!(
                f,
                "{} is staggered\n (Speed: 0, Sanity: {}, Stagger: {}/{}, Health: {}/{})",
                self.name, self.sanity, self.cur_stagger, self.max_stagger, self.cur_hp, self.max_hp
            );
        }
        let [first, second] = self.offered_skills();
        write!(
            f,
            "{}\n (Speed: {}, Sanity: {}, Skill: ({}/{}), Stagger: {}/{}, Health: {}/{})",
            self.name,
            self.speed,
            self.sanity,
            first,
            second,
            self.cur_stagger,
            self.max_stagger,
            self.cur_hp,
            self.max_hp
        )
    }
}

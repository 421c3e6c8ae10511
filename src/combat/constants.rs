//! Combat tuning constants - all default values in one place
//!
//! `EngineConfig` starts from these; a TOML config may override them.

/// Head chance (out of 100) for a combatant with zero sanity
pub const BASE_HEAD_CHANCE: i32 = 50;

/// Incoming damage multiplier while staggered (replaces resistance)
pub const STAGGER_DAMAGE_MULTIPLIER: f64 = 2.0;

/// Acts spent dead before reviving at full health
pub const DEATH_TIMER: u8 = 3;

/// Acts spent staggered before the stagger pool refills
pub const STAGGER_TIMER: u8 = 2;

/// Sanity gained by a clash winner, before the per-round bonus
pub const SANITY_RESTORE_BASE: i32 = 10;

/// Clash rounds fought before the exchange is called a draw
///
/// Only reachable when both sides tie with certainty every round (for
/// example identical skills and sanity that forces every coin).
pub const MAX_CLASH_ROUNDS: u32 = 100;

/// Skill numbers shuffled once per combatant; the first two are offered
pub const SKILL_BAG: [u8; 6] = [1, 1, 1, 2, 2, 3];

/// Number of skill choices offered from the front of the bag
pub const OFFERED_SKILLS: usize = 2;

//! Combatants, their skills and the two coin-flip damage algorithms

pub mod action;
pub mod combatant;
pub mod constants;
pub mod queue;
pub mod resistance;
pub mod resolution;
pub mod skill;

pub use action::{Action, Mode, ModeChooser};
pub use combatant::{
    Combatant, CombatantKind, CombatantStats, DamageReport, SkillCycle, TickReport, TurnState,
};
pub use queue::ActionQueue;
pub use resistance::Resistance;
pub use resolution::{ClashOutcome, Exchange, Fighter, ResolutionEvent, ResolutionLog};
pub use skill::{DamageType, Skill};

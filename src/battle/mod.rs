//! Two factions, a draft to fill them, and the act loop that plays them

pub mod battlefield;
pub mod declaration;
pub mod draft;
pub mod engine;
pub mod faction;
pub mod resolver;
pub mod roster;

pub use battlefield::Battlefield;
pub use declaration::{
    actionable_slots, build_action, can_act, check_action, Declaration, DeclarationSource,
};
pub use draft::{Draft, PICK_ORDER};
pub use engine::TurnEngine;
pub use faction::Faction;
pub use resolver::{CombatResolver, Resolution};
pub use roster::Roster;

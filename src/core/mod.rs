pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{ClashError, InvalidSelection, Result};
pub use types::{Act, CombatantRef, FactionId, SkillSlot};

use thiserror::Error;

use crate::core::types::FactionId;

/// Why a player's choice was refused. Nothing is mutated when one of these
/// is returned, so the caller can simply ask again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSelection {
    #[error("No combatant in slot {0}")]
    NoSuchCombatant(usize),

    #[error("{0} is the objective and cannot act")]
    ObjectiveCannotAct(String),

    #[error("{0} is dead")]
    Dead(String),

    #[error("{0} is staggered")]
    Staggered(String),

    #[error("Skill choice {0} is not offered this act")]
    SkillNotOffered(usize),

    #[error("{0} is on the attacker's own side")]
    FriendlyTarget(String),

    #[error("Roster has no entry {0}")]
    UnknownRosterEntry(usize),

    #[error("Roster entry {0} was already picked")]
    AlreadyPicked(usize),

    #[error("The draft is already complete")]
    DraftComplete,

    #[error("The draft still needs {0} picks")]
    DraftIncomplete(usize),
}

#[derive(Error, Debug)]
pub enum ClashError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] InvalidSelection),

    #[error("Popped an empty action queue")]
    EmptyQueuePop,

    #[error("The match is over, {0:?} lost its objective")]
    MatchOver(FactionId),

    #[error("Unknown skill type: {0:?}")]
    MalformedSkillType(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClashError>;

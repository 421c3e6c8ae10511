//! Declared actions and the clash-or-one-sided decision

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::skill::Skill;
use crate::core::types::CombatantRef;

/// How an attack resolves against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Coins flipped straight into damage
    OneSided,
    /// Coins traded against the target's own declared action first
    Clash,
}

/// The single decision the core asks of a player: clash or attack outright.
///
/// Only asked when a clash is actually on offer (see
/// [`Combatant::may_clash`]).
pub trait ModeChooser {
    fn choose_mode(&mut self, attacker: &Combatant, defender: &Combatant) -> Mode;
}

impl<F> ModeChooser for F
where
    F: FnMut(&Combatant, &Combatant) -> Mode,
{
    fn choose_mode(&mut self, attacker: &Combatant, defender: &Combatant) -> Mode {
        self(attacker, defender)
    }
}

/// One attacker's intention for this act. Replaced wholesale on
/// re-declaration, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Attacker speed when the action was declared
    pub declared_speed: i32,
    pub skill: Skill,
    pub attacker: CombatantRef,
    pub defender: CombatantRef,
    pub mode: Mode,
}

impl Action {
    pub fn new(
        declared_speed: i32,
        skill: Skill,
        attacker: CombatantRef,
        defender: CombatantRef,
        mode: Mode,
    ) -> Self {
        Self {
            declared_speed,
            skill,
            attacker,
            defender,
            mode,
        }
    }

    pub fn is_clash(&self) -> bool {
        self.mode == Mode::Clash
    }
}

//! Turning a player's picks into a validated `Action`
//!
//! Validation never mutates anything, so a rejected declaration can simply
//! be asked for again.

use crate::battle::battlefield::Battlefield;
use crate::battle::faction::Faction;
use crate::combat::action::{Action, ModeChooser};
use crate::combat::combatant::Combatant;
use crate::combat::queue::ActionQueue;
use crate::core::error::InvalidSelection;
use crate::core::types::{CombatantRef, FactionId};

/// A player's choice for one of their combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    /// Slot of the acting combatant in the declaring faction
    pub attacker: usize,
    /// Index into the two offered skills (0 or 1)
    pub skill_choice: usize,
    /// Slot of the target in the opposing faction
    pub target: usize,
}

impl Declaration {
    pub fn new(attacker: usize, skill_choice: usize, target: usize) -> Self {
        Self {
            attacker,
            skill_choice,
            target,
        }
    }
}

/// Where player decisions come from during a declaration phase
pub trait DeclarationSource: ModeChooser {
    /// The next declaration for `faction`, or None to end its phase
    fn next_declaration(
        &mut self,
        faction: FactionId,
        field: &Battlefield,
        queue: &ActionQueue,
    ) -> Option<Declaration>;

    /// Called when a declaration was refused; nothing changed
    fn rejected(
        &mut self,
        _faction: FactionId,
        _declaration: &Declaration,
        _reason: &InvalidSelection,
    ) {
    }
}

/// Can this combatant be chosen to act?
pub fn can_act(combatant: &Combatant) -> bool {
    !combatant.is_objective() && combatant.is_alive() && !combatant.is_staggered()
}

/// Slots of `faction` that may act this act
pub fn actionable_slots(faction: &Faction) -> Vec<usize> {
    faction
        .combatants()
        .iter()
        .enumerate()
        .filter(|(_, c)| can_act(c))
        .map(|(slot, _)| slot)
        .collect()
}

/// Validate `declaration` for `faction` and build the action it describes
///
/// `chooser` is asked for the mode only when a clash is on offer.
pub fn build_action<C: ModeChooser + ?Sized>(
    field: &Battlefield,
    faction: FactionId,
    declaration: &Declaration,
    chooser: &mut C,
) -> Result<Action, InvalidSelection> {
    let attacker_ref = CombatantRef::new(faction, declaration.attacker);
    let attacker = field
        .get(attacker_ref)
        .ok_or(InvalidSelection::NoSuchCombatant(declaration.attacker))?;

    if attacker.is_objective() {
        return Err(InvalidSelection::ObjectiveCannotAct(attacker.name().to_string()));
    }
    if !attacker.is_alive() {
        return Err(InvalidSelection::Dead(attacker.name().to_string()));
    }
    if attacker.is_staggered() {
        return Err(InvalidSelection::Staggered(attacker.name().to_string()));
    }

    let skill_slot = *attacker
        .offered_skills()
        .get(declaration.skill_choice)
        .ok_or(InvalidSelection::SkillNotOffered(declaration.skill_choice))?;

    let target_ref = CombatantRef::new(faction.opponent(), declaration.target);
    let target = field
        .get(target_ref)
        .ok_or(InvalidSelection::NoSuchCombatant(declaration.target))?;
    if !target.is_alive() {
        return Err(InvalidSelection::Dead(target.name().to_string()));
    }

    let mode = attacker.declare_targeting(target, skill_slot, chooser);
    Ok(Action::new(
        attacker.speed(),
        *attacker.skill(skill_slot),
        attacker_ref,
        target_ref,
        mode,
    ))
}

/// Check that an already-built action names two real combatants on
/// opposite sides
pub fn check_action(field: &Battlefield, action: &Action) -> Result<(), InvalidSelection> {
    field
        .get(action.attacker)
        .ok_or(InvalidSelection::NoSuchCombatant(action.attacker.slot))?;
    let defender = field
        .get(action.defender)
        .ok_or(InvalidSelection::NoSuchCombatant(action.defender.slot))?;
    if action.defender.faction == action.attacker.faction {
        return Err(InvalidSelection::FriendlyTarget(defender.name().to_string()));
    }
    Ok(())
}

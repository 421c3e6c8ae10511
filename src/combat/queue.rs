//! Speed-ordered queue holding at most one pending action per attacker

use crate::combat::action::Action;
use crate::core::error::{ClashError, Result};
use crate::core::types::CombatantRef;

/// Actions ordered by declared speed, fastest first. Equal speeds keep
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    actions: Vec<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an action, replacing any pending one from the same attacker
    ///
    /// A replacement takes the new action's rank, not the old one's.
    pub fn submit(&mut self, action: Action) {
        if let Some(replaced) = self.take_by_attacker(action.attacker) {
            tracing::debug!(
                "Replacing action of {:?} (speed {} -> {})",
                action.attacker,
                replaced.declared_speed,
                action.declared_speed
            );
        }

        // Strictly faster actions jump ahead; ties queue behind
        let position = self
            .actions
            .iter()
            .position(|queued| action.declared_speed > queued.declared_speed)
            .unwrap_or(self.actions.len());
        self.actions.insert(position, action);
    }

    /// Remove and return the fastest pending action
    pub fn pop_highest(&mut self) -> Result<Action> {
        if self.actions.is_empty() {
            return Err(ClashError::EmptyQueuePop);
        }
        Ok(self.actions.remove(0))
    }

    /// Remove and return the action declared by `attacker`, if any
    pub fn take_by_attacker(&mut self, attacker: CombatantRef) -> Option<Action> {
        let index = self.actions.iter().position(|a| a.attacker == attacker)?;
        Some(self.actions.remove(index))
    }

    pub fn get(&self, attacker: CombatantRef) -> Option<&Action> {
        self.actions.iter().find(|a| a.attacker == attacker)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

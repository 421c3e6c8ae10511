//! A side in the battle: one objective plus its fighting combatants

use std::fmt;

use crate::combat::combatant::Combatant;
use crate::core::error::{ClashError, Result};
use crate::core::types::FactionId;

#[derive(Debug, Clone)]
pub struct Faction {
    id: FactionId,
    name: String,
    combatants: Vec<Combatant>,
    objective: usize,
}

impl Faction {
    /// Exactly one of `combatants` must be the objective
    pub fn new(id: FactionId, name: impl Into<String>, combatants: Vec<Combatant>) -> Result<Self> {
        let name = name.into();
        let mut objectives = combatants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_objective())
            .map(|(slot, _)| slot);

        let objective = match (objectives.next(), objectives.next()) {
            (Some(slot), None) => slot,
            (None, _) => {
                return Err(ClashError::InvalidRoster(format!(
                    "{}'s team has no objective",
                    name
                )))
            }
            (Some(_), Some(_)) => {
                return Err(ClashError::InvalidRoster(format!(
                    "{}'s team has more than one objective",
                    name
                )))
            }
        };

        Ok(Self {
            id,
            name,
            combatants,
            objective,
        })
    }

    pub fn id(&self) -> FactionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatants_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn get(&self, slot: usize) -> Option<&Combatant> {
        self.combatants.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Combatant> {
        self.combatants.get_mut(slot)
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn objective_slot(&self) -> usize {
        self.objective
    }

    pub fn objective(&self) -> &Combatant {
        &self.combatants[self.objective]
    }

    /// The faction has lost once its objective is down
    pub fn is_defeated(&self) -> bool {
        !self.objective().is_alive()
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'s Team", self.name)?;
        for combatant in &self.combatants {
            if combatant.is_objective() {
                write!(f, "\n{}'s {}", self.name, combatant)?;
            } else {
                write!(f, "\n{}", combatant)?;
            }
        }
        Ok(())
    }
}

//! Both factions, addressed by `CombatantRef`

use std::fmt;

use crate::battle::faction::Faction;
use crate::combat::combatant::Combatant;
use crate::core::error::{ClashError, InvalidSelection, Result};
use crate::core::types::{CombatantRef, FactionId};

#[derive(Debug, Clone)]
pub struct Battlefield {
    factions: [Faction; 2],
}

impl Battlefield {
    /// `first` and `second` must carry the matching faction ids
    pub fn new(first: Faction, second: Faction) -> Result<Self> {
        if first.id() != FactionId::First || second.id() != FactionId::Second {
            return Err(ClashError::InvalidRoster(
                "factions must be given in First, Second order".into(),
            ));
        }
        Ok(Self {
            factions: [first, second],
        })
    }

    pub fn faction(&self, id: FactionId) -> &Faction {
        &self.factions[id.index()]
    }

    pub fn faction_mut(&mut self, id: FactionId) -> &mut Faction {
        &mut self.factions[id.index()]
    }

    pub fn factions(&self) -> &[Faction; 2] {
        &self.factions
    }

    pub fn get(&self, who: CombatantRef) -> Option<&Combatant> {
        self.faction(who.faction).get(who.slot)
    }

    pub fn get_mut(&mut self, who: CombatantRef) -> Option<&mut Combatant> {
        self.faction_mut(who.faction).get_mut(who.slot)
    }

    /// Like `get`, but a missing combatant is an `InvalidSelection`
    pub fn require(&self, who: CombatantRef) -> Result<&Combatant> {
        self.get(who)
            .ok_or(ClashError::InvalidSelection(InvalidSelection::NoSuchCombatant(who.slot)))
    }

    /// Mutable access to two combatants on opposite sides at once
    pub fn pair_mut(
        &mut self,
        a: CombatantRef,
        b: CombatantRef,
    ) -> Result<(&mut Combatant, &mut Combatant)> {
        if a.faction == b.faction {
            let name = self.require(b)?.name().to_string();
            return Err(InvalidSelection::FriendlyTarget(name).into());
        }

        let [first, second] = &mut self.factions;
        let (a_side, b_side) = match a.faction {
            FactionId::First => (first, second),
            FactionId::Second => (second, first),
        };
        let a_combatant = a_side
            .get_mut(a.slot)
            .ok_or(InvalidSelection::NoSuchCombatant(a.slot))?;
        let b_combatant = b_side
            .get_mut(b.slot)
            .ok_or(InvalidSelection::NoSuchCombatant(b.slot))?;
        Ok((a_combatant, b_combatant))
    }

    pub fn combatants_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.factions.iter_mut().flat_map(|f| f.combatants_mut())
    }

    /// Every combatant with its reference
    pub fn iter(&self) -> impl Iterator<Item = (CombatantRef, &Combatant)> {
        self.factions.iter().flat_map(|faction| {
            faction
                .combatants()
                .iter()
                .enumerate()
                .map(move |(slot, c)| (CombatantRef::new(faction.id(), slot), c))
        })
    }

    /// The first faction found whose objective is down
    pub fn defeated_faction(&self) -> Option<FactionId> {
        self.factions.iter().find(|f| f.is_defeated()).map(|f| f.id())
    }
}

impl fmt::Display for Battlefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = &self.factions;
        write!(f, "{}\n{}\n{}", first, "=".repeat(10), second)
    }
}

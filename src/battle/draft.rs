//! Team draft: six picks from the roster, alternating in the order
//! First, Second, Second, First, First, Second.

use rand::Rng;

use crate::battle::battlefield::Battlefield;
use crate::battle::faction::Faction;
use crate::battle::roster::Roster;
use crate::core::config::EngineConfig;
use crate::core::error::{InvalidSelection, Result};
use crate::core::types::FactionId;

pub const PICK_ORDER: [FactionId; 6] = [
    FactionId::First,
    FactionId::Second,
    FactionId::Second,
    FactionId::First,
    FactionId::First,
    FactionId::Second,
];

#[derive(Debug, Clone)]
pub struct Draft {
    roster_size: usize,
    picks: Vec<usize>,
}

impl Draft {
    pub fn new(roster_size: usize) -> Self {
        Self {
            roster_size,
            picks: Vec::with_capacity(PICK_ORDER.len()),
        }
    }

    /// Faction whose turn it is to pick, None once complete
    pub fn next_picker(&self) -> Option<FactionId> {
        PICK_ORDER.get(self.picks.len()).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.picks.len() == PICK_ORDER.len()
    }

    /// Roster numbers nobody has picked yet
    pub fn available(&self) -> Vec<usize> {
        (1..=self.roster_size)
            .filter(|n| !self.picks.contains(n))
            .collect()
    }

    /// Record the next pick; returns the faction that made it
    pub fn pick(&mut self, number: usize) -> std::result::Result<FactionId, InvalidSelection> {
        let picker = self.next_picker().ok_or(InvalidSelection::DraftComplete)?;
        if number == 0 || number > self.roster_size {
            return Err(InvalidSelection::UnknownRosterEntry(number));
        }
        if self.picks.contains(&number) {
            return Err(InvalidSelection::AlreadyPicked(number));
        }
        self.picks.push(number);
        Ok(picker)
    }

    /// Roster numbers picked by `faction`, in pick order
    pub fn picks_for(&self, faction: FactionId) -> Vec<usize> {
        self.picks
            .iter()
            .zip(PICK_ORDER)
            .filter(|(_, picker)| *picker == faction)
            .map(|(&number, _)| number)
            .collect()
    }

    /// Build both factions: the objective in slot 0, then the picks
    pub fn into_battlefield(
        self,
        roster: &Roster,
        names: [&str; 2],
        config: &EngineConfig,
        rng: &mut impl Rng,
    ) -> Result<Battlefield> {
        if !self.is_complete() {
            let remaining = PICK_ORDER.len() - self.picks.len();
            return Err(InvalidSelection::DraftIncomplete(remaining).into());
        }
        let first = assemble(&self, roster, FactionId::First, names[0], config, rng)?;
        let second = assemble(&self, roster, FactionId::Second, names[1], config, rng)?;
        Battlefield::new(first, second)
    }
}

fn assemble(
    draft: &Draft,
    roster: &Roster,
    faction: FactionId,
    name: &str,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Result<Faction> {
    let mut combatants = vec![roster.instantiate_objective(config, rng)?];
    for number in draft.picks_for(faction) {
        combatants.push(roster.instantiate(number, config, rng)?);
    }
    Faction::new(faction, name, combatants)
}

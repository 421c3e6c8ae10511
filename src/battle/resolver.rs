//! Drains the action queue in speed order
//!
//! Each popped action either resolves one-sided or, when it asked for a
//! clash and its target declared an action of its own, pulls that action
//! out of the queue and the two are fought as a clash. Resolution halts the
//! moment an objective dies.

use rand::Rng;

use crate::battle::battlefield::Battlefield;
use crate::battle::declaration::check_action;
use crate::combat::action::{Action, Mode};
use crate::combat::queue::ActionQueue;
use crate::combat::resolution::{Exchange, Fighter, ResolutionEvent, ResolutionLog};
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::FactionId;

/// Result of one resolution pass
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Queue drained, both objectives standing
    Completed(ResolutionLog),
    /// `faction` lost its objective; remaining actions were discarded
    ObjectiveDestroyed {
        faction: FactionId,
        log: ResolutionLog,
    },
}

impl Resolution {
    pub fn log(&self) -> &ResolutionLog {
        match self {
            Resolution::Completed(log) => log,
            Resolution::ObjectiveDestroyed { log, .. } => log,
        }
    }

    /// Faction that lost, if the match is over
    pub fn defeated(&self) -> Option<FactionId> {
        match self {
            Resolution::Completed(_) => None,
            Resolution::ObjectiveDestroyed { faction, .. } => Some(*faction),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CombatResolver {
    config: EngineConfig,
}

impl CombatResolver {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve every queued action; the queue is empty afterwards, whatever
    /// the outcome
    ///
    /// A queue holding an action that names a missing combatant or a
    /// same-side target is refused before anything is resolved.
    pub fn resolve_all(
        &self,
        field: &mut Battlefield,
        queue: &mut ActionQueue,
        rng: &mut impl Rng,
    ) -> Result<Resolution> {
        let refused = queue.iter().find_map(|a| check_action(field, a).err());
        if let Some(reason) = refused {
            queue.clear();
            return Err(reason.into());
        }

        let mut log = ResolutionLog::new();
        let result = self.drain(field, queue, rng, &mut log);
        queue.clear();

        Ok(match result? {
            Some(faction) => {
                tracing::info!("{}'s objective destroyed", field.faction(faction).name());
                log.push(ResolutionEvent::ObjectiveDestroyed { faction });
                Resolution::ObjectiveDestroyed { faction, log }
            }
            None => Resolution::Completed(log),
        })
    }

    /// Returns the defeated faction if an objective died
    fn drain(
        &self,
        field: &mut Battlefield,
        queue: &mut ActionQueue,
        rng: &mut impl Rng,
        log: &mut ResolutionLog,
    ) -> Result<Option<FactionId>> {
        while !queue.is_empty() {
            let action = queue.pop_highest()?;
            self.resolve_one(field, queue, &action, rng, log)?;

            for who in [action.attacker, action.defender] {
                let combatant = field.require(who)?;
                if combatant.is_objective() && !combatant.is_alive() {
                    return Ok(Some(who.faction));
                }
            }
        }
        Ok(None)
    }

    fn resolve_one(
        &self,
        field: &mut Battlefield,
        queue: &mut ActionQueue,
        action: &Action,
        rng: &mut impl Rng,
        log: &mut ResolutionLog,
    ) -> Result<()> {
        if !field.require(action.defender)?.is_alive() {
            tracing::debug!("{:?} targets a dead combatant, skipped", action.attacker);
            log.push(ResolutionEvent::Skipped {
                attacker: action.attacker,
                defender: action.defender,
            });
            return Ok(());
        }

        // The defender's own action, if it gets to answer with it
        let reply = match action.mode {
            Mode::OneSided => None,
            Mode::Clash => match queue.take_by_attacker(action.defender) {
                Some(reply) if !field.require(reply.attacker)?.is_staggered() => Some(reply),
                _ => None,
            },
        };

        let (attacker, defender) = field.pair_mut(action.attacker, action.defender)?;
        let mut attacker = Fighter::new(action.attacker, attacker);
        let mut defender = Fighter::new(action.defender, defender);
        let mut exchange = Exchange::new(&self.config, rng, log);

        match reply {
            Some(reply) => {
                tracing::debug!(
                    "{} begins clash against {}",
                    attacker.combatant.name(),
                    defender.combatant.name()
                );
                exchange.clash(&mut attacker, &action.skill, &mut defender, &reply.skill);
            }
            None => {
                tracing::debug!(
                    "{} attacks {} one-sided",
                    attacker.combatant.name(),
                    defender.combatant.name()
                );
                exchange.log(ResolutionEvent::OneSidedBegin {
                    attacker: action.attacker,
                    defender: action.defender,
                    skill: action.skill,
                });
                exchange.one_sided_attack(&attacker, &action.skill, &mut defender, 0);
            }
        }
        Ok(())
    }
}

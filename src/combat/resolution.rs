//! Coin-flip damage resolution
//!
//! Two algorithms:
//! - One-sided attack: each coin is flipped in turn and the running skill
//!   value is dealt as damage after every flip, re-reading the target's
//!   multiplier each time so a mid-attack stagger boosts the later coins.
//! - Clash: both sides re-flip all their remaining coins each round; the
//!   lower value loses one coin. The side that runs out of coins loses and
//!   the winner follows up with a one-sided attack using only the coins it
//!   kept.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::skill::Skill;
use crate::core::config::EngineConfig;
use crate::core::types::{CombatantRef, FactionId};

/// Something that happened while resolving the action queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionEvent {
    /// Defender was already dead; the action is consumed without effect
    Skipped {
        attacker: CombatantRef,
        defender: CombatantRef,
    },
    OneSidedBegin {
        attacker: CombatantRef,
        defender: CombatantRef,
        skill: Skill,
    },
    ClashBegin {
        attacker: CombatantRef,
        defender: CombatantRef,
    },
    ClashRound {
        round: u32,
        attacker_value: i32,
        defender_value: i32,
        /// Side that lost a coin; None on a tie
        loser: Option<CombatantRef>,
    },
    ClashWon {
        winner: CombatantRef,
        rounds: u32,
        sanity_restored: i32,
    },
    /// No side ran out of coins within the round limit
    ClashDrawn { rounds: u32 },
    CoinFlipped {
        attacker: CombatantRef,
        defender: CombatantRef,
        coin: u32,
        head: bool,
        damage: i32,
    },
    Staggered { who: CombatantRef },
    Died { who: CombatantRef },
    ObjectiveDestroyed { faction: FactionId },
}

/// Ordered record of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionLog {
    pub events: Vec<ResolutionEvent>,
}

impl ResolutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ResolutionEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolutionEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total damage dealt by coin flips against `who`
    pub fn damage_to(&self, who: CombatantRef) -> i32 {
        self.events
            .iter()
            .filter_map(|event| match event {
                ResolutionEvent::CoinFlipped {
                    defender, damage, ..
                } if *defender == who => Some(*damage),
                _ => None,
            })
            .sum()
    }
}

/// A combatant taking part in an exchange, with its battlefield identity
pub struct Fighter<'a> {
    pub id: CombatantRef,
    pub combatant: &'a mut Combatant,
}

impl<'a> Fighter<'a> {
    pub fn new(id: CombatantRef, combatant: &'a mut Combatant) -> Self {
        Self { id, combatant }
    }
}

/// How a clash ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClashOutcome {
    AttackerWon,
    DefenderWon,
    /// Both sides started with no coins; both follow up
    BothExhausted,
    Drawn,
}

/// Shared state for resolving exchanges: rules, the random source and the
/// log being written.
pub struct Exchange<'a, R: Rng> {
    config: &'a EngineConfig,
    rng: &'a mut R,
    log: &'a mut ResolutionLog,
}

impl<'a, R: Rng> Exchange<'a, R> {
    pub fn new(config: &'a EngineConfig, rng: &'a mut R, log: &'a mut ResolutionLog) -> Self {
        Self { config, rng, log }
    }

    pub fn log(&mut self, event: ResolutionEvent) {
        self.log.push(event);
    }

    fn head_chance(&self, flipper: &Combatant) -> i32 {
        flipper.head_chance(self.config.base_head_chance)
    }

    /// Heads when a draw from 0..100 falls below the (unclamped) chance
    fn flip(&mut self, head_chance: i32) -> bool {
        self.rng.gen_range(0..100) < head_chance
    }

    fn count_heads(&mut self, head_chance: i32, coins: u32) -> u32 {
        (0..coins).filter(|_| self.flip(head_chance)).count() as u32
    }

    /// Flip the coins of `skill` from `skipped_coins` on, dealing the running
    /// value after every flip. Stops as soon as the defender dies.
    ///
    /// Returns total damage dealt.
    pub fn one_sided_attack(
        &mut self,
        attacker: &Fighter<'_>,
        skill: &Skill,
        defender: &mut Fighter<'_>,
        skipped_coins: u32,
    ) -> i32 {
        let mut accumulated = skill.base_value;
        let mut coin = skipped_coins;
        let mut total = 0;

        while coin < skill.coin_count {
            coin += 1;
            let multiplier = defender.combatant.multiplier_for(skill.damage_type);
            let head = self.flip(self.head_chance(attacker.combatant));
            if head {
                accumulated += skill.coin_value;
            }
            let damage = (accumulated as f64 * multiplier).floor() as i32;

            tracing::debug!(
                "{} coin #{} {} -> {} damage to {}",
                attacker.combatant.name(),
                coin,
                if head { "head" } else { "tail" },
                damage,
                defender.combatant.name()
            );

            let report = defender.combatant.apply_damage(damage);
            total += damage;
            self.log(ResolutionEvent::CoinFlipped {
                attacker: attacker.id,
                defender: defender.id,
                coin,
                head,
                damage,
            });
            if report.staggered {
                self.log(ResolutionEvent::Staggered { who: defender.id });
            }
            if report.died {
                self.log(ResolutionEvent::Died { who: defender.id });
            }

            if !defender.combatant.is_alive() {
                break;
            }
        }

        total
    }

    /// Trade coins until one side has none left, then let the winner attack
    /// with the coins it kept
    pub fn clash(
        &mut self,
        attacker: &mut Fighter<'_>,
        attack_skill: &Skill,
        defender: &mut Fighter<'_>,
        defend_skill: &Skill,
    ) -> ClashOutcome {
        self.log(ResolutionEvent::ClashBegin {
            attacker: attacker.id,
            defender: defender.id,
        });

        let mut attacker_lost = 0;
        let mut defender_lost = 0;
        let mut round = 0;

        while attacker_lost < attack_skill.coin_count && defender_lost < defend_skill.coin_count {
            if round >= self.config.max_clash_rounds {
                tracing::warn!(
                    "Clash between {} and {} drawn after {} rounds",
                    attacker.combatant.name(),
                    defender.combatant.name(),
                    round
                );
                self.log(ResolutionEvent::ClashDrawn { rounds: round });
                return ClashOutcome::Drawn;
            }
            round += 1;

            let attacker_chance = self.head_chance(attacker.combatant);
            let defender_chance = self.head_chance(defender.combatant);
            let attacker_heads =
                self.count_heads(attacker_chance, attack_skill.coin_count - attacker_lost);
            let defender_heads =
                self.count_heads(defender_chance, defend_skill.coin_count - defender_lost);
            let attacker_value = attack_skill.value_with_heads(attacker_heads);
            let defender_value = defend_skill.value_with_heads(defender_heads);

            let loser = if attacker_value > defender_value {
                defender_lost += 1;
                Some(defender.id)
            } else if defender_value > attacker_value {
                attacker_lost += 1;
                Some(attacker.id)
            } else {
                None
            };

            tracing::debug!(
                "Clash #{} {}:{} ({} vs {})",
                round,
                attacker_value,
                defender_value,
                attacker.combatant.name(),
                defender.combatant.name()
            );
            self.log(ResolutionEvent::ClashRound {
                round,
                attacker_value,
                defender_value,
                loser,
            });
        }

        let sanity_restored = self.config.sanity_restore_base + round as i32;
        let defender_exhausted = defender_lost == defend_skill.coin_count;
        let attacker_exhausted = attacker_lost == attack_skill.coin_count;

        if defender_exhausted {
            self.declare_winner(attacker, sanity_restored, round);
            self.one_sided_attack(attacker, attack_skill, defender, attacker_lost);
        }
        if attacker_exhausted {
            self.declare_winner(defender, sanity_restored, round);
            self.one_sided_attack(defender, defend_skill, attacker, defender_lost);
        }

        match (defender_exhausted, attacker_exhausted) {
            (true, true) => ClashOutcome::BothExhausted,
            (true, false) => ClashOutcome::AttackerWon,
            _ => ClashOutcome::DefenderWon,
        }
    }

    fn declare_winner(&mut self, winner: &mut Fighter<'_>, sanity_restored: i32, rounds: u32) {
        winner.combatant.restore_sanity(sanity_restored);
        tracing::info!(
            "{} won the clash, restores {} sanity",
            winner.combatant.name(),
            sanity_restored
        );
        self.log(ResolutionEvent::ClashWon {
            winner: winner.id,
            rounds,
            sanity_restored,
        });
    }
}

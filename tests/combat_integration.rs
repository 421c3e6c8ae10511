//! Combat rules through the public API

use std::path::Path;

use coin_clash::battle::Roster;
use coin_clash::combat::*;
use coin_clash::core::{CombatantRef, EngineConfig, FactionId, SkillSlot};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const ATTACKER: CombatantRef = CombatantRef {
    faction: FactionId::First,
    slot: 1,
};
const DEFENDER: CombatantRef = CombatantRef {
    faction: FactionId::Second,
    slot: 1,
};

fn cycle() -> SkillCycle {
    let order = [1, 2, 1, 1, 2, 3]
        .iter()
        .map(|&n| SkillSlot::new(n).unwrap())
        .collect();
    SkillCycle::from_order(order).unwrap()
}

fn combatant(sanity: i32, resistance: Resistance) -> Combatant {
    let stats = CombatantStats {
        name: "Test".to_string(),
        max_hp: 100,
        max_stagger: 30,
        sanity,
        speed_min: 2,
        speed_max: 5,
        resistance,
        skills: [
            Skill::new(4, 1, 7, DamageType::Slash),
            Skill::new(4, 2, 4, DamageType::Pierce),
            Skill::new(6, 3, 2, DamageType::Bash),
        ],
    };
    Combatant::new(stats, CombatantKind::Regular, cycle()).unwrap()
}

#[test]
fn test_builtin_roster_matches_shipped_table() {
    let roster = Roster::builtin().unwrap();
    assert_eq!(roster.len(), 12);

    let names: Vec<&str> = roster.iter().map(|(_, s)| s.name.as_str()).collect();
    assert_eq!(names[0], "Yisang");
    assert_eq!(names[11], "Gregor");

    let objective = roster.objective();
    assert_eq!(objective.name, "Mephistopheles");
    assert_eq!(objective.max_hp, 50);
    assert_eq!(objective.max_stagger, 100);
    assert_eq!((objective.speed_min, objective.speed_max), (0, 0));
}

#[test]
fn test_roster_multipliers_round_trip() {
    let roster = Roster::builtin().unwrap();
    let config = EngineConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for (number, stats) in roster.iter() {
        let combatant = roster.instantiate(number, &config, &mut rng).unwrap();
        for damage_type in DamageType::ALL {
            assert_eq!(
                combatant.multiplier_for(damage_type),
                stats.resistance.of(damage_type),
                "{} {:?}",
                stats.name,
                damage_type
            );
        }
    }
}

#[test]
fn test_shipped_engine_config_loads() {
    let config = EngineConfig::load(Path::new("data/engine.toml")).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_forced_head_against_slash_weakness() {
    let config = EngineConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut log = ResolutionLog::new();

    let mut a = combatant(60, Resistance::default());
    let mut d = combatant(0, Resistance::new(2.0, 1.0, 1.0).unwrap());
    let attacker = Fighter::new(ATTACKER, &mut a);
    let mut defender = Fighter::new(DEFENDER, &mut d);
    let skill = Skill::new(4, 1, 7, DamageType::Slash);

    let dealt = Exchange::new(&config, &mut rng, &mut log).one_sided_attack(
        &attacker,
        &skill,
        &mut defender,
        0,
    );

    assert_eq!(dealt, 22);
    assert_eq!(log.damage_to(DEFENDER), 22);
    assert_eq!(d.hp(), 78);
}

#[test]
fn test_single_coin_clash_decided_in_round_one() {
    let config = EngineConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut log = ResolutionLog::new();

    let mut a = combatant(60, Resistance::default());
    let mut d = combatant(-60, Resistance::default());
    let mut attacker = Fighter::new(ATTACKER, &mut a);
    let mut defender = Fighter::new(DEFENDER, &mut d);
    let skill = Skill::new(3, 1, 5, DamageType::Bash);

    let outcome = Exchange::new(&config, &mut rng, &mut log).clash(
        &mut attacker,
        &skill,
        &mut defender,
        &skill,
    );

    assert_eq!(outcome, ClashOutcome::AttackerWon);
    let rounds: Vec<&ResolutionEvent> = log
        .iter()
        .filter(|e| matches!(e, ResolutionEvent::ClashRound { .. }))
        .collect();
    assert_eq!(rounds.len(), 1);
    // Follow-up starts from coin #1: nothing was lost
    assert!(log.iter().any(|e| matches!(
        e,
        ResolutionEvent::CoinFlipped { coin: 1, damage: 8, .. }
    )));
    assert_eq!(d.hp(), 92);
}

#[test]
fn test_death_recovers_after_exactly_three_ticks() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut c = combatant(0, Resistance::default());

    let report = c.apply_damage(250);
    assert!(report.died);
    assert_eq!(c.hp(), 0);
    assert_eq!(c.turn_state(), TurnState::Dead(3));

    c.tick_turn_start(&mut rng);
    c.tick_turn_start(&mut rng);
    assert_eq!(c.hp(), 0);
    assert!(!c.is_alive());

    let tick = c.tick_turn_start(&mut rng);
    assert!(tick.revived);
    assert_eq!(c.hp(), c.max_hp());
    assert_eq!(c.death_timer(), 0);
}

#[test]
fn test_queue_orders_by_declared_speed() {
    let skill = Skill::new(4, 1, 7, DamageType::Slash);
    let action = |slot: usize, speed: i32| {
        Action::new(
            speed,
            skill,
            CombatantRef::new(FactionId::First, slot),
            DEFENDER,
            Mode::OneSided,
        )
    };

    let mut queue = ActionQueue::new();
    queue.submit(action(1, 5));
    queue.submit(action(2, 9));
    queue.submit(action(3, 3));
    queue.submit(action(1, 1));

    let order: Vec<(usize, i32)> = std::iter::from_fn(|| queue.pop_highest().ok())
        .map(|a| (a.attacker.slot, a.declared_speed))
        .collect();
    assert_eq!(order, vec![(2, 9), (3, 3), (1, 1)]);
}

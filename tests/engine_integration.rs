//! Whole acts and whole matches driven through `TurnEngine`

use coin_clash::battle::*;
use coin_clash::combat::*;
use coin_clash::core::{
    ClashError, CombatantRef, EngineConfig, FactionId, InvalidSelection, SkillSlot,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Every actionable combatant goes straight for the enemy objective
#[derive(Default)]
struct Aggressor {
    refused: usize,
}

impl ModeChooser for Aggressor {
    fn choose_mode(&mut self, _: &Combatant, _: &Combatant) -> Mode {
        Mode::Clash
    }
}

impl DeclarationSource for Aggressor {
    fn next_declaration(
        &mut self,
        faction: FactionId,
        field: &Battlefield,
        queue: &ActionQueue,
    ) -> Option<Declaration> {
        let target = field.faction(faction.opponent()).objective_slot();
        actionable_slots(field.faction(faction))
            .into_iter()
            .find(|&slot| queue.get(CombatantRef::new(faction, slot)).is_none())
            .map(|slot| Declaration::new(slot, 0, target))
    }

    fn rejected(&mut self, _: FactionId, _: &Declaration, _: &InvalidSelection) {
        self.refused += 1;
    }
}

fn one_sided(_: &Combatant, _: &Combatant) -> Mode {
    Mode::OneSided
}

fn cycle() -> SkillCycle {
    let order = [1, 2, 1, 1, 2, 3]
        .iter()
        .map(|&n| SkillSlot::new(n).unwrap())
        .collect();
    SkillCycle::from_order(order).unwrap()
}

/// First offered skill is `opening`
fn stats(name: &str, speed: i32, max_hp: i32, opening: Skill) -> CombatantStats {
    CombatantStats {
        name: name.to_string(),
        max_hp,
        max_stagger: 20,
        sanity: 60,
        speed_min: speed,
        speed_max: speed,
        resistance: Resistance::uniform(1.0),
        skills: [
            opening,
            Skill::new(4, 2, 4, DamageType::Pierce),
            Skill::new(6, 3, 2, DamageType::Bash),
        ],
    }
}

fn side(id: FactionId, name: &str, fighters: Vec<CombatantStats>) -> Faction {
    let roster = Roster::builtin().unwrap();
    let mut combatants = vec![Combatant::new(
        roster.objective().clone(),
        CombatantKind::Objective,
        cycle(),
    )
    .unwrap()];
    combatants.extend(
        fighters
            .into_iter()
            .map(|s| Combatant::new(s, CombatantKind::Regular, cycle()).unwrap()),
    );
    Faction::new(id, name, combatants).unwrap()
}

fn drafted_engine(seed: u64) -> TurnEngine<ChaCha8Rng> {
    let roster = Roster::builtin().unwrap();
    let config = EngineConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut draft = Draft::new(roster.len());
    for number in [1, 8, 12, 3, 5, 10] {
        draft.pick(number).unwrap();
    }
    let field = draft
        .into_battlefield(&roster, ["Faust", "Dante"], &config, &mut rng)
        .unwrap();
    TurnEngine::new(field, config, rng)
}

#[test]
fn test_drafted_teams_follow_pick_order() {
    let engine = drafted_engine(1);
    let field = engine.battlefield();

    let names = |id: FactionId| -> Vec<String> {
        field
            .faction(id)
            .combatants()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    };
    assert_eq!(
        names(FactionId::First),
        vec!["Mephistopheles", "Yisang", "Don Quixote", "Meursault"]
    );
    assert_eq!(
        names(FactionId::Second),
        vec!["Mephistopheles", "Ishmael", "Gregor", "Sinclair"]
    );
}

#[test]
fn test_aggressive_match_ends_with_destroyed_objective() {
    let mut engine = drafted_engine(2024);
    let mut source = Aggressor::default();

    let mut last = None;
    for _ in 0..50 {
        let resolution = engine.play_act(&mut source).unwrap();
        assert!(engine.queue().is_empty());
        if resolution.defeated().is_some() {
            last = Some(resolution);
            break;
        }
    }

    let resolution = last.expect("match should finish within 50 acts");
    let loser = resolution.defeated().unwrap();
    assert!(engine.is_over());
    assert_eq!(engine.winner(), Some(loser.opponent()));
    assert!(!engine.battlefield().faction(loser).objective().is_alive());
    assert_eq!(source.refused, 0);
    assert!(matches!(
        engine.play_act(&mut source),
        Err(ClashError::MatchOver(_))
    ));
}

#[test]
fn test_same_seed_replays_identically() {
    let play = |seed: u64| -> Vec<String> {
        let mut engine = drafted_engine(seed);
        let mut source = Aggressor::default();
        let mut logs = Vec::new();
        while !engine.is_over() && engine.act() < 50 {
            let resolution = engine.play_act(&mut source).unwrap();
            logs.push(serde_json::to_string(resolution.log()).unwrap());
        }
        logs
    };

    assert_eq!(play(77), play(77));
}

#[test]
fn test_objective_death_discards_remaining_actions() {
    let finisher = Skill::new(50, 1, 0, DamageType::Slash);
    let jab = Skill::new(4, 1, 7, DamageType::Slash);
    let field = Battlefield::new(
        side(FactionId::First, "Faust", vec![stats("Yisang", 6, 100, finisher)]),
        side(
            FactionId::Second,
            "Dante",
            vec![stats("Ryoshu", 2, 100, jab), stats("Outis", 3, 100, jab)],
        ),
    )
    .unwrap();
    let mut engine = TurnEngine::new(field, EngineConfig::default(), ChaCha8Rng::seed_from_u64(9));

    engine.advance_act().unwrap();
    engine
        .declare(FactionId::Second, &Declaration::new(1, 0, 1), &mut one_sided)
        .unwrap();
    engine
        .declare(FactionId::Second, &Declaration::new(2, 0, 1), &mut one_sided)
        .unwrap();
    engine
        .declare(FactionId::First, &Declaration::new(1, 0, 0), &mut one_sided)
        .unwrap();
    assert_eq!(engine.queue().len(), 3);

    let resolution = engine.resolve().unwrap();

    assert_eq!(resolution.defeated(), Some(FactionId::Second));
    let begun = resolution
        .log()
        .iter()
        .filter(|e| matches!(e, ResolutionEvent::OneSidedBegin { .. }))
        .count();
    assert_eq!(begun, 1);
    assert_eq!(
        engine
            .battlefield()
            .get(CombatantRef::new(FactionId::First, 1))
            .unwrap()
            .hp(),
        100
    );
    assert!(engine.queue().is_empty());
}

#[test]
fn test_killed_combatant_sits_out_then_revives() {
    let finisher = Skill::new(50, 1, 0, DamageType::Slash);
    let jab = Skill::new(4, 1, 7, DamageType::Slash);
    let field = Battlefield::new(
        side(FactionId::First, "Faust", vec![stats("Yisang", 6, 100, finisher)]),
        side(FactionId::Second, "Dante", vec![stats("Ryoshu", 2, 40, jab)]),
    )
    .unwrap();
    let mut engine = TurnEngine::new(field, EngineConfig::default(), ChaCha8Rng::seed_from_u64(9));
    let ryoshu = CombatantRef::new(FactionId::Second, 1);
    let strike_back = Declaration::new(1, 0, 1);

    engine.advance_act().unwrap();
    engine
        .declare(FactionId::First, &Declaration::new(1, 0, 1), &mut one_sided)
        .unwrap();
    engine.resolve().unwrap();
    assert_eq!(
        engine.battlefield().get(ryoshu).unwrap().turn_state(),
        TurnState::Dead(3)
    );

    // Acts 2 and 3: still dead
    for _ in 0..2 {
        engine.advance_act().unwrap();
        let refused = engine.declare(FactionId::Second, &strike_back, &mut one_sided);
        assert!(matches!(
            refused,
            Err(ClashError::InvalidSelection(InvalidSelection::Dead(_)))
        ));
        engine.resolve().unwrap();
    }

    // Act 4: back at full health, stagger long recovered
    engine.advance_act().unwrap();
    let ryoshu_now = engine.battlefield().get(ryoshu).unwrap();
    assert_eq!(ryoshu_now.hp(), 40);
    assert_eq!(ryoshu_now.turn_state(), TurnState::Active);
    assert!(engine
        .declare(FactionId::Second, &strike_back, &mut one_sided)
        .is_ok());
}

//! Act-by-act driver
//!
//! An act is: every combatant ticks (speed roll, recovery timers), the
//! first faction declares, the second faction declares, then the queue is
//! resolved and cleared. The engine owns the random source so a seeded run
//! is fully reproducible.

use rand::Rng;

use crate::battle::battlefield::Battlefield;
use crate::battle::declaration::{build_action, check_action, Declaration, DeclarationSource};
use crate::battle::resolver::{CombatResolver, Resolution};
use crate::combat::action::{Action, ModeChooser};
use crate::combat::queue::ActionQueue;
use crate::core::config::EngineConfig;
use crate::core::error::{ClashError, Result};
use crate::core::types::{Act, FactionId};

pub struct TurnEngine<R: Rng> {
    field: Battlefield,
    queue: ActionQueue,
    resolver: CombatResolver,
    rng: R,
    act: Act,
    defeated: Option<FactionId>,
}

impl<R: Rng> TurnEngine<R> {
    pub fn new(field: Battlefield, config: EngineConfig, rng: R) -> Self {
        Self {
            field,
            queue: ActionQueue::new(),
            resolver: CombatResolver::new(config),
            rng,
            act: 0,
            defeated: None,
        }
    }

    /// Acts started so far; 0 before the first `advance_act`
    pub fn act(&self) -> Act {
        self.act
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.field
    }

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    pub fn config(&self) -> &EngineConfig {
        self.resolver.config()
    }

    /// Faction whose objective was destroyed, once the match is over
    pub fn defeated(&self) -> Option<FactionId> {
        self.defeated
    }

    pub fn winner(&self) -> Option<FactionId> {
        self.defeated.map(FactionId::opponent)
    }

    pub fn is_over(&self) -> bool {
        self.defeated.is_some()
    }

    fn ensure_running(&self) -> Result<()> {
        match self.defeated {
            Some(faction) => Err(ClashError::MatchOver(faction)),
            None => Ok(()),
        }
    }

    /// Start a new act: roll speeds and advance recovery timers everywhere
    pub fn advance_act(&mut self) -> Result<Act> {
        self.ensure_running()?;
        self.act += 1;
        tracing::info!("Act {} begins", self.act);

        for combatant in self.field.combatants_mut() {
            combatant.tick_turn_start(&mut self.rng);
        }
        Ok(self.act)
    }

    /// Validate a declaration and queue the resulting action
    ///
    /// A refused declaration leaves the engine untouched.
    pub fn declare<C: ModeChooser + ?Sized>(
        &mut self,
        faction: FactionId,
        declaration: &Declaration,
        chooser: &mut C,
    ) -> Result<Action> {
        self.ensure_running()?;
        let action = build_action(&self.field, faction, declaration, chooser)?;
        self.queue.submit(action);
        Ok(action)
    }

    /// Queue an already-built action, replacing the attacker's previous one
    ///
    /// Both ends must exist and sit on opposite sides; a refused action is
    /// not queued.
    pub fn submit(&mut self, action: Action) -> Result<()> {
        self.ensure_running()?;
        check_action(&self.field, &action)?;
        self.queue.submit(action);
        Ok(())
    }

    /// Resolve everything queued this act
    pub fn resolve(&mut self) -> Result<Resolution> {
        self.ensure_running()?;
        let resolution = self
            .resolver
            .resolve_all(&mut self.field, &mut self.queue, &mut self.rng)?;
        self.defeated = resolution.defeated();
        Ok(resolution)
    }

    /// Run a whole act, asking `source` for every decision
    pub fn play_act<S: DeclarationSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Resolution> {
        self.advance_act()?;
        for faction in FactionId::BOTH {
            self.declaration_phase(faction, source);
        }
        self.resolve()
    }

    fn declaration_phase<S: DeclarationSource + ?Sized>(
        &mut self,
        faction: FactionId,
        source: &mut S,
    ) {
        while let Some(declaration) = source.next_declaration(faction, &self.field, &self.queue) {
            match build_action(&self.field, faction, &declaration, source) {
                Ok(action) => self.queue.submit(action),
                Err(reason) => {
                    tracing::warn!("{:?} declaration refused: {}", faction, reason);
                    source.rejected(faction, &declaration, &reason);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battlefield::tests::{fighter, test_battlefield};
    use crate::combat::action::Mode;
    use crate::combat::combatant::tests::slash;
    use crate::combat::combatant::Combatant;
    use crate::combat::resolution::ResolutionEvent;
    use crate::core::error::InvalidSelection;
    use crate::core::types::CombatantRef;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine(first: Vec<Combatant>, second: Vec<Combatant>) -> TurnEngine<ChaCha8Rng> {
        TurnEngine::new(
            test_battlefield(first, second),
            EngineConfig::default(),
            ChaCha8Rng::seed_from_u64(7),
        )
    }

    fn always(mode: Mode) -> impl FnMut(&Combatant, &Combatant) -> Mode {
        move |_: &Combatant, _: &Combatant| mode
    }

    /// Plays a fixed list of declarations, recording refusals
    struct Script {
        pending: Vec<(FactionId, Declaration)>,
        mode: Mode,
        refused: Vec<InvalidSelection>,
    }

    impl Script {
        fn new(mut pending: Vec<(FactionId, Declaration)>, mode: Mode) -> Self {
            pending.reverse();
            Self {
                pending,
                mode,
                refused: Vec::new(),
            }
        }
    }

    impl ModeChooser for Script {
        fn choose_mode(&mut self, _: &Combatant, _: &Combatant) -> Mode {
            self.mode
        }
    }

    impl DeclarationSource for Script {
        fn next_declaration(
            &mut self,
            faction: FactionId,
            _field: &Battlefield,
            _queue: &ActionQueue,
        ) -> Option<Declaration> {
            match self.pending.last() {
                Some((owner, _)) if *owner == faction => self.pending.pop().map(|(_, d)| d),
                _ => None,
            }
        }

        fn rejected(&mut self, _: FactionId, _: &Declaration, reason: &InvalidSelection) {
            self.refused.push(reason.clone());
        }
    }

    #[test]
    fn test_act_counter() {
        let mut engine = engine(vec![fighter("Yisang", 4, 0)], vec![fighter("Ryoshu", 2, 0)]);
        assert_eq!(engine.act(), 0);
        assert_eq!(engine.advance_act().unwrap(), 1);
        assert_eq!(engine.advance_act().unwrap(), 2);
        assert_eq!(engine.act(), 2);
    }

    #[test]
    fn test_declare_queues_action() {
        let mut engine = engine(vec![fighter("Yisang", 4, 0)], vec![fighter("Ryoshu", 2, 0)]);
        engine.advance_act().unwrap();

        let action = engine
            .declare(FactionId::First, &Declaration::new(1, 0, 1), &mut always(Mode::Clash))
            .unwrap();

        assert_eq!(action.declared_speed, 4);
        assert_eq!(action.mode, Mode::Clash);
        assert_eq!(action.defender, CombatantRef::new(FactionId::Second, 1));
        assert_eq!(engine.queue().len(), 1);
    }

    #[test]
    fn test_refused_declaration_leaves_queue_alone() {
        let mut engine = engine(vec![fighter("Yisang", 4, 0)], vec![fighter("Ryoshu", 2, 0)]);
        engine.advance_act().unwrap();

        let result = engine.declare(
            FactionId::First,
            &Declaration::new(0, 0, 1),
            &mut always(Mode::Clash),
        );

        assert!(matches!(
            result,
            Err(ClashError::InvalidSelection(InvalidSelection::ObjectiveCannotAct(_)))
        ));
        assert!(engine.queue().is_empty());
    }

    #[test]
    fn test_submit_refuses_unresolvable_actions() {
        let mut engine = engine(
            vec![fighter("Yisang", 9, 0), fighter("Faust", 1, 0)],
            vec![fighter("Ryoshu", 5, 0)],
        );
        engine.advance_act().unwrap();
        let yisang = CombatantRef::new(FactionId::First, 1);
        let faust = CombatantRef::new(FactionId::First, 2);
        let ryoshu = CombatantRef::new(FactionId::Second, 1);
        let hit = |speed, attacker, defender| {
            Action::new(speed, slash(4, 1, 7), attacker, defender, Mode::OneSided)
        };

        engine.submit(hit(9, yisang, ryoshu)).unwrap();
        let missing = engine.submit(hit(5, ryoshu, CombatantRef::new(FactionId::First, 7)));
        assert!(matches!(
            missing,
            Err(ClashError::InvalidSelection(InvalidSelection::NoSuchCombatant(7)))
        ));
        let friendly = engine.submit(hit(5, ryoshu, CombatantRef::new(FactionId::Second, 0)));
        assert!(matches!(
            friendly,
            Err(ClashError::InvalidSelection(InvalidSelection::FriendlyTarget(_)))
        ));
        engine.submit(hit(1, faust, ryoshu)).unwrap();
        assert_eq!(engine.queue().len(), 2);

        let resolution = engine.resolve().unwrap();

        let begun: Vec<CombatantRef> = resolution
            .log()
            .iter()
            .filter_map(|event| match event {
                ResolutionEvent::OneSidedBegin { attacker, .. } => Some(*attacker),
                _ => None,
            })
            .collect();
        assert_eq!(begun, vec![yisang, faust]);
        assert!(engine.queue().is_empty());
    }

    #[test]
    fn test_play_act_runs_both_phases() {
        let mut engine = engine(vec![fighter("Yisang", 4, 0)], vec![fighter("Ryoshu", 2, 0)]);
        let mut script = Script::new(
            vec![
                (FactionId::First, Declaration::new(1, 0, 1)),
                (FactionId::Second, Declaration::new(1, 0, 1)),
            ],
            Mode::OneSided,
        );

        let resolution = engine.play_act(&mut script).unwrap();

        assert_eq!(engine.act(), 1);
        assert!(engine.queue().is_empty());
        assert!(script.refused.is_empty());
        assert_eq!(resolution.defeated(), None);
        let first = CombatantRef::new(FactionId::First, 1);
        let second = CombatantRef::new(FactionId::Second, 1);
        assert!(resolution.log().damage_to(first) > 0);
        assert!(resolution.log().damage_to(second) > 0);
    }

    #[test]
    fn test_play_act_reports_refusals_and_continues() {
        let mut engine = engine(vec![fighter("Yisang", 4, 0)], vec![fighter("Ryoshu", 2, 0)]);
        let mut script = Script::new(
            vec![
                (FactionId::First, Declaration::new(1, 2, 1)),
                (FactionId::First, Declaration::new(1, 0, 9)),
                (FactionId::First, Declaration::new(1, 1, 1)),
            ],
            Mode::OneSided,
        );

        let resolution = engine.play_act(&mut script).unwrap();

        assert_eq!(
            script.refused,
            vec![
                InvalidSelection::SkillNotOffered(2),
                InvalidSelection::NoSuchCombatant(9)
            ]
        );
        assert!(resolution.log().damage_to(CombatantRef::new(FactionId::Second, 1)) > 0);
    }

    #[test]
    fn test_match_over_blocks_further_play() {
        let mut engine = engine(vec![fighter("Yisang", 4, 60)], vec![fighter("Ryoshu", 2, 0)]);
        engine.advance_act().unwrap();
        // Skill choice 1 is 4+4x2: 8 then 12 per attack against 50 hp
        for _ in 0..5 {
            engine
                .declare(
                    FactionId::First,
                    &Declaration::new(1, 1, 0),
                    &mut always(Mode::OneSided),
                )
                .unwrap();
            if engine.resolve().unwrap().defeated().is_some() {
                break;
            }
        }

        assert_eq!(engine.defeated(), Some(FactionId::Second));
        assert_eq!(engine.winner(), Some(FactionId::First));
        assert!(matches!(
            engine.advance_act(),
            Err(ClashError::MatchOver(FactionId::Second))
        ));
        assert!(matches!(engine.resolve(), Err(ClashError::MatchOver(_))));
    }
}

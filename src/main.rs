//! Coin Clash - hot-seat terminal front end
//!
//! Two players share one terminal: names, a six-pick draft, then act after
//! act of declarations until one objective falls.

use clap::Parser;
use coin_clash::battle::{
    actionable_slots, Battlefield, Declaration, DeclarationSource, Draft, Resolution, Roster,
    TurnEngine,
};
use coin_clash::combat::constants::OFFERED_SKILLS;
use coin_clash::combat::{ActionQueue, Combatant, Mode, ModeChooser, ResolutionEvent};
use coin_clash::core::{CombatantRef, EngineConfig, FactionId, InvalidSelection, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hot-seat two-team coin-flip combat
#[derive(Parser, Debug)]
#[command(name = "coin-clash")]
#[command(about = "Two players draft teams and fight to destroy each other's objective")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Roster TOML file (defaults to the built-in roster)
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Engine config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of player 1
    #[arg(long)]
    p1: Option<String>,

    /// Name of player 2
    #[arg(long)]
    p2: Option<String>,

    /// Also print every act's resolution log as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coin_clash=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let roster = match &args.roster {
        Some(path) => Roster::load(path)?,
        None => Roster::builtin()?,
    };

    let seed = args.seed.unwrap_or_else(|| rand::random());
    tracing::info!("Seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut terminal = Terminal::new(io::stdin().lock());
    println!("Welcome to Coin Clash");

    let Some(p1) = player_name(&mut terminal, args.p1, 1)? else {
        return Ok(());
    };
    let Some(p2) = player_name(&mut terminal, args.p2, 2)? else {
        return Ok(());
    };

    let names = [p1.as_str(), p2.as_str()];
    let Some(draft) = run_draft(&mut terminal, &roster, names)? else {
        return Ok(());
    };
    let field = draft.into_battlefield(&roster, names, &config, &mut rng)?;
    let mut engine = TurnEngine::new(field, config, rng);

    while !engine.is_over() {
        terminal.act = engine.act() + 1;
        let resolution = engine.play_act(&mut terminal)?;
        if terminal.quit {
            return Ok(());
        }

        println!("{}", "=".repeat(40));
        for event in resolution.log().iter() {
            if let Some(line) = narrate(engine.battlefield(), event) {
                println!("{}", line);
            }
        }
        if args.json {
            println!("{}", serde_json::to_string(resolution.log())?);
        }

        if let Resolution::ObjectiveDestroyed { faction, .. } = resolution {
            let field = engine.battlefield();
            let loser = field.faction(faction);
            println!(
                "{}'s {} is destroyed. {} wins after {} acts!",
                loser.name(),
                loser.objective().name(),
                field.faction(faction.opponent()).name(),
                engine.act()
            );
        }
    }

    Ok(())
}

fn player_name<R: BufRead>(
    terminal: &mut Terminal<R>,
    given: Option<String>,
    number: u8,
) -> Result<Option<String>> {
    if let Some(name) = given {
        return Ok(Some(name));
    }
    let name = terminal.ask(&format!("Please enter the name of player {}: ", number))?;
    if let Some(name) = &name {
        println!("Player {}'s name is {}.", number, name);
    }
    Ok(name)
}

fn run_draft<R: BufRead>(
    terminal: &mut Terminal<R>,
    roster: &Roster,
    names: [&str; 2],
) -> Result<Option<Draft>> {
    for (number, stats) in roster.iter() {
        println!("{:>2}. {}", number, stats.name);
    }

    let mut draft = Draft::new(roster.len());
    while let Some(picker) = draft.next_picker() {
        let prompt = format!(
            "{}, pick a number from 1 to {} to add to your team: ",
            names[picker.index()],
            roster.len()
        );
        let Some(number) = terminal.ask_number(&prompt)? else {
            return Ok(None);
        };
        if let Err(reason) = draft.pick(number) {
            println!("Invalid choice. {}", reason);
        }
    }
    Ok(Some(draft))
}

/// One line of narration per event worth showing
fn narrate(field: &Battlefield, event: &ResolutionEvent) -> Option<String> {
    let name = |who: &CombatantRef| field.get(*who).map_or("?", Combatant::name);
    let line = match event {
        ResolutionEvent::Skipped { defender, .. } => format!("{} is already dead", name(defender)),
        ResolutionEvent::OneSidedBegin {
            attacker, defender, ..
        } => format!("{} is attacking {} one-sided", name(attacker), name(defender)),
        ResolutionEvent::ClashBegin { attacker, defender } => {
            format!("{} begin clash against {}", name(attacker), name(defender))
        }
        ResolutionEvent::ClashRound {
            round,
            attacker_value,
            defender_value,
            ..
        } => format!("Clash #{}: {} vs {}", round, attacker_value, defender_value),
        ResolutionEvent::ClashWon {
            winner,
            sanity_restored,
            ..
        } => format!(
            "{} won the clash and restores {} sanity",
            name(winner),
            sanity_restored
        ),
        ResolutionEvent::ClashDrawn { rounds } => {
            format!("Nobody gives way; the clash ends after {} rounds", rounds)
        }
        ResolutionEvent::CoinFlipped {
            attacker,
            defender,
            coin,
            head,
            damage,
        } => format!(
            "{} coin #{}: {}, {} damage to {}",
            name(attacker),
            coin,
            if *head { "head" } else { "tail" },
            damage,
            name(defender)
        ),
        ResolutionEvent::Staggered { who } => format!("{} is staggered", name(who)),
        ResolutionEvent::Died { who } => format!("{} is dead", name(who)),
        ResolutionEvent::ObjectiveDestroyed { .. } => return None,
    };
    Some(line)
}

/// Line-based prompts on a shared terminal
struct Terminal<R: BufRead> {
    input: R,
    act: u32,
    quit: bool,
}

impl<R: BufRead> Terminal<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            act: 0,
            quit: false,
        }
    }

    /// None on end of input or `q`
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.quit = true;
            return Ok(None);
        }
        let line = line.trim();
        if line == "q" {
            self.quit = true;
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }

    fn ask_number(&mut self, prompt: &str) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => println!("Invalid input. Please enter a valid integer."),
            }
        }
    }

    fn board(&self, field: &Battlefield) {
        println!("{}", "=".repeat(40));
        println!("Act {}", self.act);
        println!("{}", "=".repeat(10));
        println!("{}", field);
        println!("{}", "=".repeat(40));
    }

    /// Walk one declaration through character, skill and target choice
    fn compose(
        &mut self,
        faction: FactionId,
        field: &Battlefield,
    ) -> io::Result<Option<Declaration>> {
        let side = field.faction(faction);
        println!("Choose which character to make an action:");
        for slot in actionable_slots(side) {
            if let Some(combatant) = side.get(slot) {
                println!("{}. {}", slot, combatant.summary());
            }
        }
        let prompt = "Enter the number of the character you want to attack with: ";
        let Some(attacker) = self.ask_number(prompt)? else {
            return Ok(None);
        };

        if let Some(combatant) = side.get(attacker) {
            println!("Which skill do you want {} to use?", combatant.name());
            for (choice, slot) in combatant.offered_skills().iter().enumerate() {
                println!("{}: {}, {}", choice + 1, slot, combatant.skill(*slot));
            }
        }
        let skill = loop {
            let prompt = "Enter the number of the skill slot you want to use: ";
            match self.ask_number(prompt)? {
                Some(choice @ 1..=OFFERED_SKILLS) => break choice,
                Some(_) => println!("Wrong input. Try again"),
                None => return Ok(None),
            }
        };

        let enemy = field.faction(faction.opponent());
        println!("Choose which character to attack:");
        for (slot, combatant) in enemy.combatants().iter().enumerate() {
            println!("{}. {}", slot, combatant.summary());
        }
        let prompt = "Enter the number of the character you want to attack: ";
        let Some(target) = self.ask_number(prompt)? else {
            return Ok(None);
        };

        // Skill choices are shown 1-based
        Ok(Some(Declaration::new(attacker, skill - 1, target)))
    }
}

impl<R: BufRead> ModeChooser for Terminal<R> {
    fn choose_mode(&mut self, attacker: &Combatant, defender: &Combatant) -> Mode {
        println!(
            "{} is faster than {}, you can choose to perform one-side attack or clash",
            attacker.name(),
            defender.name()
        );
        loop {
            match self.ask_number("Enter 1 to perform one-side attack, 2 to match clash: ") {
                Ok(Some(1)) | Ok(None) | Err(_) => return Mode::OneSided,
                Ok(Some(2)) => return Mode::Clash,
                Ok(Some(_)) => println!("Wrong input. Try again"),
            }
        }
    }
}

impl<R: BufRead> DeclarationSource for Terminal<R> {
    fn next_declaration(
        &mut self,
        faction: FactionId,
        field: &Battlefield,
        queue: &ActionQueue,
    ) -> Option<Declaration> {
        if self.quit {
            return None;
        }
        self.board(field);
        println!("{}, it's your turn.", field.faction(faction).name());

        loop {
            let pending = queue.iter().filter(|a| a.attacker.faction == faction).count();
            let prompt = format!(
                "{} action(s) declared. Press 0 to make action, 1 to see the board, \
                 2 to end turn, q to quit the game: ",
                pending
            );
            match self.ask(&prompt) {
                Ok(Some(choice)) => match choice.as_str() {
                    "0" => match self.compose(faction, field) {
                        Ok(Some(declaration)) => return Some(declaration),
                        Ok(None) | Err(_) => return None,
                    },
                    "1" => self.board(field),
                    "2" => return None,
                    _ => println!("Invalid Input"),
                },
                Ok(None) | Err(_) => return None,
            }
        }
    }

    fn rejected(
        &mut self,
        _faction: FactionId,
        _declaration: &Declaration,
        reason: &InvalidSelection,
    ) {
        println!("Invalid input. {}", reason);
    }
}

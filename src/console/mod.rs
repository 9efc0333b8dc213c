//! The interactive console game: main menu, new/loaded games and the play
//! loop. Reads answers from any `BufRead` and writes to any `Write`.

pub mod prompt;
pub mod view;

use crate::battle::ai::WeightedRandomAI;
use crate::battle::events::EventLog;
use crate::battle::runner::{apply_command, end_turn, run_ai_battle, take_ai_turn, RoundStatus, TurnCommand};
use crate::battle::state::BattleState;
use crate::catalog::{Catalog, Difficulty};
use crate::config::GameConfig;
use crate::errors::{ActionError, GameError, SaveError};
use crate::player::{PlayerAction, Side};
use crate::rng::GameRng;
use crate::save::{list_saves, SaveGame};
use prompt::{Prompt, INVALID_INDEX};
use schema::SpeciesId;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Turns after which an unattended bot game is called off.
pub const BOT_TURN_LIMIT: u32 = 10_000;

#[derive(Debug)]
pub enum ConsoleError {
    /// The input stream ended; the session is over.
    InputClosed,
    Io(io::Error),
    Game(GameError),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::InputClosed => write!(f, "Input closed"),
            ConsoleError::Io(err) => write!(f, "Console I/O failed: {}", err),
            ConsoleError::Game(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        ConsoleError::Io(err)
    }
}

impl From<GameError> for ConsoleError {
    fn from(err: GameError) -> Self {
        ConsoleError::Game(err)
    }
}

impl From<ActionError> for ConsoleError {
    fn from(err: ActionError) -> Self {
        ConsoleError::Game(err.into())
    }
}

impl From<SaveError> for ConsoleError {
    fn from(err: SaveError) -> Self {
        ConsoleError::Game(err.into())
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

const ATTACK_KEY: char = 'a';
const SKILL_KEY: char = 's';
const EVOLUTION_KEY: char = 'e';
const CHANGE_KEY: char = 'c';

fn action_key(action: PlayerAction) -> char {
    match action {
        PlayerAction::Attack => ATTACK_KEY,
        PlayerAction::UseSkill => SKILL_KEY,
        PlayerAction::Evolve => EVOLUTION_KEY,
        PlayerAction::Reselect => CHANGE_KEY,
    }
}

pub struct Console<R, W> {
    prompt: Prompt<R, W>,
    catalog: Arc<Catalog>,
    config: GameConfig,
    rng: GameRng,
    ai: WeightedRandomAI,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, catalog: Arc<Catalog>, config: GameConfig, rng: GameRng) -> Self {
        Self {
            prompt: Prompt::new(input, output),
            catalog,
            config,
            rng,
            ai: WeightedRandomAI::new(),
        }
    }

    /// The main menu loop. Returns once the player exits or input ends.
    pub fn run(&mut self) -> ConsoleResult<()> {
        match self.main_menu() {
            Err(ConsoleError::InputClosed) => {
                tracing::debug!("input closed, leaving the game");
                Ok(())
            }
            other => other,
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.prompt.into_inner()
    }

    fn main_menu(&mut self) -> ConsoleResult<()> {
        loop {
            match self.prompt.choose(view::MAIN_MENU, &view::MAIN_MENU_OPTIONS)? {
                0 => {
                    let state = self.new_game()?;
                    self.play(state, true)?;
                }
                1 => {
                    if let Some(state) = self.load_game()? {
                        self.play(state, false)?;
                    }
                }
                2 => self.watch_bot_game()?,
                _ => return Ok(()),
            }
        }
    }

    fn ask_for_difficulty(&mut self) -> ConsoleResult<Arc<Difficulty>> {
        let catalog = Arc::clone(&self.catalog);
        let names: Vec<&str> = catalog.difficulties().iter().map(|d| d.name.as_str()).collect();
        let index = self.prompt.choose("Select difficulty:", &names)?;
        let difficulty = Arc::clone(&catalog.difficulties()[index]);

        self.prompt.say(format_args!("Selected result: {}", difficulty.name))?;
        self.prompt.say(format_args!(
            "You will face {} enemies. Good luck!",
            difficulty.enemy_team_count
        ))?;
        Ok(difficulty)
    }

    fn ask_for_team(&mut self, team_size: usize) -> ConsoleResult<Vec<SpeciesId>> {
        let catalog = Arc::clone(&self.catalog);
        let species = catalog.all_species();
        let names: Vec<&str> = species.iter().map(|s| s.name.as_str()).collect();

        self.prompt.say(format_args!(
            "You need to create a team. Select {} creatures.",
            team_size
        ))?;
        for (index, name) in names.iter().enumerate() {
            self.prompt.say(format_args!("{}) {}", index, name))?;
        }

        let mut picks = Vec::with_capacity(team_size);
        let mut picked_names = Vec::with_capacity(team_size);
        for _ in 0..team_size {
            let index = self.prompt.ask_index(species.len(), |_| true)?;
            picks.push(species[index].id);
            picked_names.push(names[index]);
        }

        self.prompt.say("Done!")?;
        self.prompt.say(view::team_presentation(&picked_names))?;
        Ok(picks)
    }

    fn new_game(&mut self) -> ConsoleResult<BattleState> {
        let difficulty = self.ask_for_difficulty()?;
        let picks = self.ask_for_team(difficulty.player_team_size)?;
        let state = BattleState::new(
            Arc::clone(&self.catalog),
            difficulty,
            &picks,
            self.config.rules,
            &mut self.rng,
        )?;
        Ok(state)
    }

    fn load_game(&mut self) -> ConsoleResult<Option<BattleState>> {
        let saves = list_saves(&self.config.save_dir)?;
        if saves.is_empty() {
            self.prompt.say("No saved games.")?;
            return Ok(None);
        }

        let index = self.prompt.choose("Select a saved game:", &saves)?;
        let name = &saves[index];
        let restored = SaveGame::read_from(&self.config.save_dir, name)
            .and_then(|save| save.restore(Arc::clone(&self.catalog)));
        match restored {
            Ok(state) => {
                self.prompt.say(format_args!("{} loaded.", name))?;
                Ok(Some(state))
            }
            Err(err) => {
                tracing::warn!(%err, save = %name, "could not load save");
                self.prompt.say(format_args!("Could not load {}: {}", name, err))?;
                Ok(None)
            }
        }
    }

    fn play(&mut self, mut state: BattleState, fresh: bool) -> ConsoleResult<()> {
        let log = EventLog::attach(state.events_mut());

        if fresh {
            self.prompt.say("Game is about to start...")?;
            self.prompt.say("\n")?;
            self.show_team(&state, Side::Player)?;
            let first = self.ask_for_creature_reselection(&state)?;
            state.select_creature(Side::Player, first)?;
            self.show_events(&log)?;
        }

        loop {
            let side = state.active_side();
            if side.is_player() {
                self.show_team(&state, Side::Enemy)?;
                self.show_team(&state, Side::Player)?;
            }
            for line in view::turn_header(side.is_player()) {
                self.prompt.say(line)?;
            }

            if side.is_player() {
                if !state.try_obligatory_turn(side) {
                    let command = self.ask_for_player_command(&state)?;
                    apply_command(&mut state, side, command, &mut self.rng)?;
                }
            } else {
                take_ai_turn(&mut state, side, &self.ai, &mut self.rng)?;
            }
            self.show_events(&log)?;

            match end_turn(&mut state)? {
                RoundStatus::Ongoing => {}
                RoundStatus::EnemyPassed { .. } => {
                    self.show_lines(view::round_winner(true))?;
                    self.show_events(&log)?;
                    self.ask_for_saving(&state)?;
                }
                RoundStatus::Finished { winner } => {
                    self.show_events(&log)?;
                    self.show_lines(view::round_winner(winner.is_player()))?;
                    self.show_lines(view::game_winner(winner.is_player()))?;
                    return Ok(());
                }
            }
        }
    }

    fn watch_bot_game(&mut self) -> ConsoleResult<()> {
        let difficulty = self.ask_for_difficulty()?;
        let picks: Vec<SpeciesId> = (0..difficulty.player_team_size)
            .map(|_| self.catalog.random_species(&mut self.rng).id)
            .collect();
        let mut state = BattleState::new(
            Arc::clone(&self.catalog),
            difficulty,
            &picks,
            self.config.rules,
            &mut self.rng,
        )?;
        let log = EventLog::attach(state.events_mut());

        let winner = run_ai_battle(&mut state, &self.ai, &self.ai, &mut self.rng, BOT_TURN_LIMIT)?;
        self.show_events(&log)?;
        match winner {
            Some(winner) => self.show_lines(view::game_winner(winner.is_player())),
            None => self.prompt.say(format_args!(
                "The bots gave up after {} turns.",
                state.turn_index()
            )),
        }
    }

    fn ask_for_player_command(&mut self, state: &BattleState) -> ConsoleResult<TurnCommand> {
        let legal = state.legal_actions(Side::Player);
        if legal.is_empty() {
            return Err(ActionError::NoLegalAction(Side::Player).into());
        }
        for &action in &legal {
            self.prompt.say(format_args!("{}) {}", action_key(action), action))?;
        }

        let action = loop {
            let token = self.prompt.next_token()?;
            let chosen = legal
                .iter()
                .copied()
                .find(|&action| token.chars().eq(std::iter::once(action_key(action))));
            match chosen {
                Some(action) => break action,
                None => self.prompt.say(INVALID_INDEX)?,
            }
        };

        Ok(match action {
            PlayerAction::Attack => TurnCommand::Attack,
            PlayerAction::UseSkill => TurnCommand::UseSkill,
            PlayerAction::Evolve => TurnCommand::Evolve,
            PlayerAction::Reselect => TurnCommand::Select(self.ask_for_creature_reselection(state)?),
        })
    }

    fn ask_for_creature_reselection(&mut self, state: &BattleState) -> ConsoleResult<usize> {
        let team = state.player_team();
        self.prompt.say("Select creature sent to the arena:")?;
        let index = self
            .prompt
            .ask_index(team.len(), |i| state.can_select(Side::Player, i))?;
        self.prompt.say(format_args!("The {} on its way!", team.creatures()[index].name()))?;
        Ok(index)
    }

    fn ask_for_saving(&mut self, state: &BattleState) -> ConsoleResult<()> {
        if !self.prompt.ask_yes_no("Do you want to save the game? (y/n)")? {
            return Ok(());
        }
        self.prompt.say("Enter save name:")?;
        let name = self.prompt.next_token()?;
        match SaveGame::capture(state).write_to(&self.config.save_dir, &name) {
            Ok(_) => self.prompt.say(format_args!("{} saved.", name)),
            Err(err) => {
                tracing::warn!(%err, save = %name, "could not save game");
                self.prompt.say(format_args!("Could not save {}: {}", name, err))
            }
        }
    }

    fn show_team(&mut self, state: &BattleState, side: Side) -> ConsoleResult<()> {
        self.show_lines(view::team_status(state.team(side), side.is_player()))
    }

    fn show_events(&mut self, log: &EventLog) -> ConsoleResult<()> {
        for event in log.drain() {
            self.show_lines(view::event_lines(&event))?;
        }
        Ok(())
    }

    fn show_lines<L: fmt::Display>(&mut self, lines: impl IntoIterator<Item = L>) -> ConsoleResult<()> {
        for line in lines {
            self.prompt.say(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{standard_catalog, MUDLING};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn run_console(input: &str, rng: GameRng, save_dir: PathBuf) -> String {
        let config = GameConfig {
            save_dir,
            ..GameConfig::default()
        };
        let mut console = Console::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            standard_catalog(),
            config,
            rng,
        );
        console.run().expect("console session");
        let (_, output) = console.into_inner();
        String::from_utf8(output).expect("utf-8 output")
    }

    fn missing_dir() -> PathBuf {
        std::env::temp_dir().join(format!("creature-arena-console-{}", std::process::id()))
    }

    #[test]
    fn test_exit_from_main_menu() {
        let output = run_console("3\n", GameRng::new_for_test(vec![]), missing_dir());
        assert!(output.starts_with(view::MAIN_MENU));
        assert!(output.contains("3) Exit"));
    }

    #[test]
    fn test_closed_input_ends_session() {
        let output = run_console("", GameRng::new_for_test(vec![]), missing_dir());
        assert!(output.contains("0) New game"));
    }

    #[test]
    fn test_load_without_saves() {
        let output = run_console("1\n3\n", GameRng::new_for_test(vec![]), missing_dir());
        assert!(output.contains("No saved games."));
    }

    #[test]
    fn test_scripted_game_lost_to_the_computer() {
        // Test difficulty, Mudling against a rolled Striker. Every draw is 0.0:
        // every attack lands and the bot always attacks.
        let species_index = standard_catalog()
            .all_species()
            .iter()
            .position(|s| s.id == MUDLING)
            .expect("Mudling is in the catalog");
        let input = format!("0\n0\n{}\n0\na\na\n3\n", species_index);

        let output = run_console(&input, GameRng::new_for_test(vec![0.0; 20]), missing_dir());

        assert!(output.contains("Mudling will be a great team!"));
        assert!(output.contains("The Mudling on its way!"));
        assert!(output.contains("Player has selected Mudling (0)"));
        assert!(output.contains("Mudling has attacked Striker for 8 HP."));
        assert!(output.contains("Striker has attacked Mudling for 15 HP."));
        assert!(output.contains("Mudling has died!"));
        assert!(output.contains("COMPUTER WINS ROUND!"));
        assert!(output.contains("COMPUTER WINS GAME!"));
    }

    #[test]
    fn test_unavailable_action_key_is_rejected() {
        let species_index = standard_catalog()
            .all_species()
            .iter()
            .position(|s| s.id == MUDLING)
            .expect("Mudling is in the catalog");
        // Mudling has no skill and cannot evolve yet.
        let input = format!("0\n0\n{}\n0\ns e a\na\n3\n", species_index);

        let output = run_console(&input, GameRng::new_for_test(vec![0.0; 20]), missing_dir());

        assert_eq!(output.matches(INVALID_INDEX).count(), 2);
        assert!(output.contains("COMPUTER WINS GAME!"));
    }
}

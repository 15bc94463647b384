//! Game progression: turns, clocks and game end.
//!
//! The [`Orchestrator`] owns the live [`Board`] and both players. Each call to
//! [`step`](Orchestrator::step) asks the side to move for a move, applies it,
//! notifies the opponent and checks whether the game is over.
//!
//! # Game Flow
//!
//! ```text
//! [Request Move] -> [Player provides move] -> [Apply on Board]
//!   -> [Notify opponent] -> [Check End] -> [Request Move] ...
//! ```
//!
//! Players that cannot answer yet (a human who has not clicked, or an engine
//! whose search was cancelled) return `None`; the orchestrator then takes no
//! action. Only the clock can end a game in that state.

use std::time::Duration;

use crate::agent::ai::EnginePlayer;
use crate::agent::human_player::HumanPlayer;
use crate::agent::player::{GameResult, Player};
use crate::arbiter::GameStatus;
use crate::board::Board;
use crate::clock::GameClock;
use crate::config::{GameConfig, PlayerConfig};
use crate::error::ChessResult;
use crate::game_repr::{Move, Square, Team, Type};

/// What a single [`Orchestrator::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A move was applied
    Moved(Move),
    /// The side to move produced no move; nothing changed
    Waiting,
    /// The game is over
    Finished(GameResult),
}

/// Root component coordinating the board and the two players.
pub struct Orchestrator {
    board: Board,

    /// (white, black)
    players: (Box<dyn Player>, Box<dyn Player>),

    clock: Option<GameClock>,

    /// Game is drawn once this many plies have been played
    max_plies: Option<u32>,

    /// Set once both players have been told the result
    result: Option<GameResult>,
}

impl Orchestrator {
    /// Create an orchestrator for a board and two players.
    pub fn new(board: Board, white: Box<dyn Player>, black: Box<dyn Player>) -> Self {
        Self { board, players: (white, black), clock: None, max_plies: None, result: None }
    }

    /// Build board and players from a configuration.
    ///
    /// Engine sides get distinct seeds derived from `config.seed`, so an engine
    /// mirror match is reproducible without both sides playing in lockstep.
    ///
    /// # Errors
    ///
    /// `InvalidFen` if the configured starting position does not parse.
    pub fn from_config(config: &GameConfig) -> ChessResult<Self> {
        let board = Board::from_position(config.starting_position()?);
        let white = make_player(config.white, Team::White, config.seed);
        let black = make_player(config.black, Team::Black, config.seed);

        let mut orchestrator = Self::new(board, white, black);
        orchestrator.clock = config.time_control.map(GameClock::new);
        orchestrator.max_plies = config.max_plies;

        log::info!(
            "new game: {} (white) vs {} (black) from {}",
            orchestrator.players.0.name(),
            orchestrator.players.1.name(),
            config.starting_fen
        );
        Ok(orchestrator)
    }

    pub fn with_clock(mut self, per_side: Duration) -> Self {
        self.clock = Some(GameClock::new(per_side));
        self
    }

    pub fn with_max_plies(mut self, plies: u32) -> Self {
        self.max_plies = Some(plies);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access for front ends, e.g. to drain events.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn clock(&self) -> Option<&GameClock> {
        self.clock.as_ref()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_active(&self) -> bool {
        self.result.is_none()
    }

    fn player_mut(&mut self, team: Team) -> &mut dyn Player {
        match team {
            Team::White => self.players.0.as_mut(),
            _ => self.players.1.as_mut(),
        }
    }

    /// Forward a square click to the side to move, then poll it for a move.
    ///
    /// # Errors
    ///
    /// Whatever [`step`](Self::step) reports.
    pub fn click(&mut self, square: Option<Square>) -> ChessResult<StepOutcome> {
        if let Some(result) = self.result {
            return Ok(StepOutcome::Finished(result));
        }
        let team = self.board.to_move();
        let (white, black) = &mut self.players;
        let player = match team {
            Team::White => white,
            _ => black,
        };
        if player.handle_click(&mut self.board, square) {
            self.step()
        } else {
            Ok(StepOutcome::Waiting)
        }
    }

    /// Advance the game by at most one move.
    ///
    /// # Errors
    ///
    /// `IllegalMove` if the side to move hands out a move the board rejects.
    /// The game stays where it was.
    pub fn step(&mut self) -> ChessResult<StepOutcome> {
        if let Some(result) = self.result {
            return Ok(StepOutcome::Finished(result));
        }
        if let Some(result) = self.check_game_end() {
            return Ok(StepOutcome::Finished(result));
        }

        let team = self.board.to_move();
        let budget = self.clock.as_mut().map(|clock| {
            if clock.running() != Some(team) {
                clock.start(team);
            }
            clock.move_budget(team)
        });

        let position = self.board.position().clone();
        let player = self.player_mut(team);
        let Some(mv) = player.get_move(&position, budget) else {
            return Ok(self.check_time(team).map_or(StepOutcome::Waiting, StepOutcome::Finished));
        };
        let promotion = if position.is_promotion(&mv) {
            player.promotion_choice(&position, mv)
        } else {
            Type::Queen
        };

        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        if let Some(result) = self.check_time(team) {
            return Ok(StepOutcome::Finished(result));
        }

        if let Err(err) = self.board.play(mv, promotion) {
            log::warn!("{} handed out a rejected move {}: {}", self.player_mut(team).name(), mv, err);
            return Err(err);
        }
        log::info!("{:?} ({}) plays {}", team, self.player_mut(team).name(), mv);
        self.player_mut(team.opponent()).opponent_moved(mv);

        Ok(self.check_game_end().map_or(StepOutcome::Moved(mv), StepOutcome::Finished))
    }

    /// Play until the game ends.
    ///
    /// # Returns
    ///
    /// `None` if a side stops producing moves in an untimed game, since nothing
    /// would ever end it.
    ///
    /// # Errors
    ///
    /// As for [`step`](Self::step).
    pub fn run(&mut self) -> ChessResult<Option<GameResult>> {
        loop {
            match self.step()? {
                StepOutcome::Finished(result) => return Ok(Some(result)),
                StepOutcome::Moved(_) => {}
                StepOutcome::Waiting if self.clock.is_some() => std::thread::sleep(Duration::from_millis(1)),
                StepOutcome::Waiting => {
                    let team = self.board.to_move();
                    log::warn!("{} has no move and there is no clock, stopping", self.player_mut(team).name());
                    return Ok(None);
                }
            }
        }
    }

    /// Concludes the game if `team` ran out of time.
    fn check_time(&mut self, team: Team) -> Option<GameResult> {
        let flagged = self.clock.as_ref().is_some_and(|clock| clock.is_flagged(team));
        if !flagged {
            return None;
        }
        log::warn!("{:?} ran out of time", team);
        self.board.conclude(GameStatus::win_for(team.opponent()));
        self.check_game_end()
    }

    /// Detect the end of the game, by rule or by ply cap, and tell both players.
    fn check_game_end(&mut self) -> Option<GameResult> {
        if let Some(result) = self.result {
            return Some(result);
        }
        let capped = self
            .max_plies
            .is_some_and(|cap| self.board.history().len() >= cap as usize);
        if capped && !self.board.is_over() {
            log::info!("ply cap reached after {} plies", self.board.history().len());
            self.board.conclude(GameStatus::Draw);
        }

        let result = GameResult::from_status(self.board.status())?;
        self.handle_game_end(result);
        Some(result)
    }

    fn handle_game_end(&mut self, result: GameResult) {
        log::info!("game over: {:?} after {} plies", result, self.board.history().len());
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        self.result = Some(result);
        self.players.0.game_ended(result);
        self.players.1.game_ended(result);
    }
}

fn make_player(config: PlayerConfig, team: Team, seed: Option<u64>) -> Box<dyn Player> {
    match config {
        PlayerConfig::Human => Box::new(HumanPlayer::new(format!("{team:?}"))),
        PlayerConfig::Engine { difficulty } => {
            let seed = seed.map(|s| s.wrapping_add(team.index() as u64));
            Box::new(EnginePlayer::with_difficulty(difficulty, seed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::scripted_player::ScriptedPlayer;
    use crate::config::Difficulty;
    use crate::events::GameEvent;

    fn scripted(name: &str, script: &str) -> Box<dyn Player> {
        Box::new(ScriptedPlayer::new(name.to_string(), script).unwrap())
    }

    #[test]
    fn test_fools_mate_game() {
        let mut game = Orchestrator::new(Board::new(), scripted("W", "f2f3 g2g4"), scripted("B", "e7e5 d8h4"));
        assert_eq!(game.run().unwrap(), Some(GameResult::BlackWins));
        assert_eq!(game.board().history().len(), 4);
        assert!(!game.is_game_active());
        assert_eq!(game.step().unwrap(), StepOutcome::Finished(GameResult::BlackWins));
    }

    #[test]
    fn test_exhausted_script_without_clock_stops() {
        let mut game = Orchestrator::new(Board::new(), scripted("W", "e2e4"), scripted("B", ""));
        assert_eq!(game.run().unwrap(), None);
        assert_eq!(game.board().history().len(), 1);
        assert!(game.is_game_active());
    }

    #[test]
    fn test_ply_cap_draws() {
        let mut game =
            Orchestrator::new(Board::new(), scripted("W", "g1f3 f3g1"), scripted("B", "g8f6 f6g8")).with_max_plies(2);
        assert_eq!(game.run().unwrap(), Some(GameResult::Draw));
        assert_eq!(game.board().history().len(), 2);
    }

    #[test]
    fn test_flagged_side_loses() {
        let mut game = Orchestrator::new(Board::new(), scripted("W", ""), scripted("B", "")).with_clock(Duration::ZERO);
        assert_eq!(game.step().unwrap(), StepOutcome::Finished(GameResult::BlackWins));
        assert_eq!(game.board().status(), GameStatus::BlackWins);
    }

    #[test]
    fn test_scripted_under_promotion() {
        // The black pawn keeps mating material on the board after the promotion
        let board = Board::from_fen("8/P6k/7p/8/8/8/8/K7 w - - 0 1").unwrap();
        let mut game = Orchestrator::new(board, scripted("W", "a7a8n"), scripted("B", ""));
        assert!(matches!(game.step().unwrap(), StepOutcome::Moved(_)));
        let knight = game.board().piece_at("a8".parse().unwrap()).unwrap();
        assert_eq!(knight.piece_type(), Type::Knight);
        assert!(game
            .board_mut()
            .drain_events()
            .contains(&GameEvent::Promoted { square: "a8".parse().unwrap(), piece_type: Type::Knight }));
    }

    #[test]
    fn test_clicks_drive_human_side() {
        let mut game = Orchestrator::from_config(&GameConfig::pvp()).unwrap();
        assert_eq!(game.click(Some("e2".parse().unwrap())).unwrap(), StepOutcome::Waiting);
        match game.click(Some("e4".parse().unwrap())).unwrap() {
            StepOutcome::Moved(mv) => assert_eq!(mv.to.to_string(), "e4"),
            other => panic!("expected a move, got {other:?}"),
        }
        assert_eq!(game.board().to_move(), Team::Black);
        assert_eq!(game.step().unwrap(), StepOutcome::Waiting);
    }

    #[test]
    fn test_engine_vs_engine_respects_rules() {
        let config = GameConfig::aivai(Difficulty::Easy, Difficulty::Easy).with_seed(3).with_max_plies(12);
        let mut game = Orchestrator::from_config(&config).unwrap();
        let result = game.run().unwrap();
        assert!(result.is_some());
        assert!(game.board().history().len() <= 12);
    }

    #[test]
    fn test_bad_fen_aborts_setup() {
        let config = GameConfig::pvp().with_fen("not a position");
        assert!(Orchestrator::from_config(&config).is_err());
    }
}

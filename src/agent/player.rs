//! Player trait and associated types for chess game agents.
//!
//! This module provides the core abstraction for entities that can provide chess moves.
//! Different player types (scripted, engine, or an external front end) implement the
//! `Player` trait to take part in games driven by the orchestrator.
//!
//! The trait focuses on **behavior** rather than construction. An engine player needs
//! search limits and a seed, a scripted player needs its list of moves, so each
//! implementation provides its own constructor.
//!
//! # Blocking
//!
//! `get_move()` is synchronous: the orchestrator calls it and waits. An engine player
//! does its concurrent work inside the call and returns once every candidate has been
//! searched or its thinking budget runs out.

use std::time::Duration;

use crate::arbiter::GameStatus;
use crate::board::Board;
use crate::game_repr::{Move, Position, Square, Team, Type};

/// Result of a completed chess game.
///
/// This enum is passed to players via `game_ended()` to notify them of the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White player won the game (Black was checkmated or ran out of time)
    WhiteWins,
    /// Black player won the game (White was checkmated or ran out of time)
    BlackWins,
    /// Draw by repetition, the fifty-move rule, insufficient material or the ply cap
    Draw,
    /// The player to move has no legal moves but is not in check
    Stalemate,
}

impl GameResult {
    /// Create a GameResult from the winning team
    pub fn from_winner(winner: Team) -> Self {
        match winner {
            Team::White => GameResult::WhiteWins,
            _ => GameResult::BlackWins,
        }
    }

    /// Result reported for a terminal status; `None` while the game goes on.
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::InProgress => None,
            GameStatus::WhiteWins => Some(GameResult::WhiteWins),
            GameStatus::BlackWins => Some(GameResult::BlackWins),
            GameStatus::Stalemate => Some(GameResult::Stalemate),
            GameStatus::Draw | GameStatus::ThreefoldRepetition | GameStatus::FivefoldRepetition => {
                Some(GameResult::Draw)
            }
        }
    }
}

/// Trait for entities that can provide chess moves.
///
/// # Required Methods
///
/// Only `get_move()` must be implemented. All other methods have default implementations
/// that can be overridden as needed.
///
/// # Method Behavior
///
/// ## `get_move()`
/// - **Returns `None`**: the player has nothing to offer (out of scripted moves, or its
///   search was cancelled). The orchestrator decides what that means for the game.
/// - **Returns `Some(Move)`**: a move which must be in `position.legal_moves()`; the
///   board rejects anything else.
///
/// ## `promotion_choice()`
/// - Default: Queen
/// - Override: for players that want to under-promote
///
/// ## `handle_click()`
/// - Default: ignore the click
/// - Override: for players driven by square selection
///
/// ## `opponent_moved()` / `game_ended()`
/// - Default: do nothing
pub trait Player {
    /// Request the next move for the side to move in `position`.
    ///
    /// `budget` is the wall-clock time the player may use, if the game is timed.
    fn get_move(&mut self, position: &Position, budget: Option<Duration>) -> Option<Move>;

    /// Piece to promote to when `mv` puts a pawn on its last rank.
    fn promotion_choice(&mut self, _position: &Position, _mv: Move) -> Type {
        Type::Queen
    }

    /// Forward a click on `square` (`None` when off the board) to this player.
    ///
    /// Returns `true` when the click completed a move for `get_move()` to hand out.
    fn handle_click(&mut self, _board: &mut Board, _square: Option<Square>) -> bool {
        false
    }

    /// Notify this player that the opponent made a move.
    fn opponent_moved(&mut self, _mv: Move) {
        // Default: do nothing
    }

    /// Notify this player that the game has ended.
    fn game_ended(&mut self, _result: GameResult) {
        // Default: do nothing
    }

    /// Get the display name of this player.
    fn name(&self) -> &str {
        "Player"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_from_status() {
        assert_eq!(GameResult::from_status(GameStatus::InProgress), None);
        assert_eq!(GameResult::from_status(GameStatus::BlackWins), Some(GameResult::BlackWins));
        assert_eq!(GameResult::from_status(GameStatus::ThreefoldRepetition), Some(GameResult::Draw));
        assert_eq!(GameResult::from_status(GameStatus::Stalemate), Some(GameResult::Stalemate));
    }

    #[test]
    fn test_result_from_winner() {
        assert_eq!(GameResult::from_winner(Team::White), GameResult::WhiteWins);
        assert_eq!(GameResult::from_winner(Team::Black), GameResult::BlackWins);
    }
}

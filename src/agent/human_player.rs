//! Human player fed by square clicks from whatever front end drives the game.
//!
//! The core never sees windows or mice. A front end converts its input to
//! board squares and forwards them with [`HumanPlayer::click`]; once a click
//! sequence completes a legal move, the move waits in the player until the
//! orchestrator polls [`Player::get_move`].
//!
//! # Click Handling Logic
//!
//! - **Click outside board** (`None`): deselect
//! - **Nothing selected + click on own piece**: select it
//! - **Piece selected + click on legal destination**: create the move and deselect
//! - **Piece selected + click on another own piece**: reselect
//! - **Anything else**: deselect
//!
//! Selection lives on the [`Board`] so that every listener sees the same
//! highlighted square and its cached moves.

use std::time::Duration;

use crate::agent::player::Player;
use crate::board::Board;
use crate::game_repr::{Move, Position, Square, Team, Type};

/// Human player that makes moves through square clicks.
pub struct HumanPlayer {
    name: String,

    /// Move completed by the last click sequence, handed out by `get_move()`
    pending_move: Option<Move>,

    /// Piece picked ahead of time for the next promotion
    promotion: Option<Type>,
}

impl HumanPlayer {
    pub fn new(name: String) -> Self {
        Self { name, pending_move: None, promotion: None }
    }

    /// Process a click on `square` (`None` for a click off the board).
    ///
    /// # Returns
    ///
    /// `true` when the click completed a legal move.
    pub fn click(&mut self, board: &mut Board, square: Option<Square>) -> bool {
        let Some(clicked) = square else {
            board.set_selected(None);
            return false;
        };
        let team = board.to_move();

        if board.selected().is_none() {
            if owns(board, clicked, team) {
                board.set_selected(Some(clicked));
            }
            return false;
        }

        if let Some(mv) = board.legal_moves_for_selection().iter().find(|mv| mv.to == clicked).copied() {
            log::debug!("[{}] clicked move {}", self.name, mv);
            self.pending_move = Some(mv);
            board.set_selected(None);
            return true;
        }

        if owns(board, clicked, team) {
            board.set_selected(Some(clicked));
        } else {
            board.set_selected(None);
        }
        false
    }

    /// Queue the piece used for this player's next promotion.
    pub fn choose_promotion(&mut self, piece_type: Type) {
        self.promotion = Some(piece_type);
    }

    pub fn has_pending_move(&self) -> bool {
        self.pending_move.is_some()
    }
}

fn owns(board: &Board, square: Square, team: Team) -> bool {
    board.piece_at(square).is_some_and(|piece| piece.team == team)
}

impl Player for HumanPlayer {
    /// Never blocks: returns the move completed by clicks so far, if any.
    fn get_move(&mut self, _position: &Position, _budget: Option<Duration>) -> Option<Move> {
        self.pending_move.take()
    }

    fn promotion_choice(&mut self, _position: &Position, _mv: Move) -> Type {
        self.promotion.take().unwrap_or(Type::Queen)
    }

    fn handle_click(&mut self, board: &mut Board, square: Option<Square>) -> bool {
        self.click(board, square)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_human_player_new() {
        let player = HumanPlayer::new("Test Player".to_string());
        assert_eq!(player.name(), "Test Player");
        assert!(!player.has_pending_move());
    }

    #[test]
    fn test_select_then_move() {
        let mut board = Board::new();
        let mut player = HumanPlayer::new("White".to_string());

        assert!(!player.click(&mut board, Some(sq("e2"))));
        assert_eq!(board.selected(), Some(sq("e2")));
        assert_eq!(board.legal_moves_for_selection().len(), 2);

        assert!(player.click(&mut board, Some(sq("e4"))));
        assert_eq!(board.selected(), None);

        let mv = player.get_move(board.position(), None).unwrap();
        assert_eq!((mv.from, mv.to), (sq("e2"), sq("e4")));
        assert!(player.get_move(board.position(), None).is_none());
    }

    #[test]
    fn test_opponent_piece_not_selectable() {
        let mut board = Board::new();
        let mut player = HumanPlayer::new("White".to_string());
        player.click(&mut board, Some(sq("e7")));
        assert_eq!(board.selected(), None);
    }

    #[test]
    fn test_reselect_and_deselect() {
        let mut board = Board::new();
        let mut player = HumanPlayer::new("White".to_string());

        player.click(&mut board, Some(sq("e2")));
        player.click(&mut board, Some(sq("g1")));
        assert_eq!(board.selected(), Some(sq("g1")));

        // Knight cannot reach e5
        player.click(&mut board, Some(sq("e5")));
        assert_eq!(board.selected(), None);

        player.click(&mut board, Some(sq("d2")));
        player.click(&mut board, None);
        assert_eq!(board.selected(), None);
        assert!(!player.has_pending_move());
    }

    #[test]
    fn test_queued_promotion_choice() {
        let position = Position::default();
        let mv = position.legal_moves()[0];
        let mut player = HumanPlayer::new("White".to_string());
        assert_eq!(player.promotion_choice(&position, mv), Type::Queen);
        player.choose_promotion(Type::Knight);
        assert_eq!(player.promotion_choice(&position, mv), Type::Knight);
        assert_eq!(player.promotion_choice(&position, mv), Type::Queen);
    }
}

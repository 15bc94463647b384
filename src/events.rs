//! Notifications produced by the live board for whoever drives the game.
//!
//! Events are queued on the [`Board`](crate::board::Board) and drained by the
//! game loop; the core never knows who listens.

use std::collections::VecDeque;

use crate::arbiter::GameStatus;
use crate::game_repr::{Move, Piece, Square, Team, Type};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A move was applied to the live board. `piece` is the mover as it stood
    /// before the move.
    MoveApplied { team: Team, piece: Piece, mv: Move },
    /// The secondary rook move of a castling, for display only
    RookRelocated { mv: Move },
    /// The king of `team` is in check after the last move
    KingInCheck(Team),
    /// A pawn reached its last rank; the board waits for a choice.
    /// `candidate` is what an engine-controlled side would pick.
    PromotionRequired { pawn: Piece, mv: Move, candidate: Type },
    /// A pending promotion was resolved
    Promoted { square: Square, piece_type: Type },
    /// The selected square changed
    SelectionChanged(Option<Square>),
    /// The game reached a terminal state
    GameConcluded(GameStatus),
}

/// First-in first-out queue of events not yet handed out.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::trace!("event: {event:?}");
        self.pending.push_back(event);
    }

    /// Hands out every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

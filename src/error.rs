//! Error types for the rules core and game progression.
//!
//! Only malformed input is reported through [`ChessError`]. A cancelled search is
//! not an error (it yields `None`), and broken engine invariants panic.

use thiserror::Error;

use crate::arbiter::GameStatus;
use crate::game_repr::Type;

/// Errors raised when input from outside the core is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Position notation could not be parsed
    #[error("invalid position notation: {reason}")]
    InvalidFen { reason: String },

    /// A square name outside a1..h8
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    /// A serialized move or plan token that does not decode
    #[error("invalid move token: {0:?}")]
    InvalidMoveToken(String),

    /// A move that is not in the legal list of the position
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// A move was submitted after the game concluded
    #[error("game is already over: {0:?}")]
    GameOver(GameStatus),

    /// A move was submitted while a promotion choice is outstanding
    #[error("a promotion choice is pending")]
    PromotionPending,

    /// A promotion choice was submitted with nothing to promote
    #[error("no promotion is pending")]
    NoPendingPromotion,

    /// Pawns may only become a queen, rook, bishop or knight
    #[error("cannot promote to {0:?}")]
    InvalidPromotion(Type),
}

impl ChessError {
    pub(crate) fn fen(reason: impl Into<String>) -> Self {
        ChessError::InvalidFen { reason: reason.into() }
    }
}

/// Result type alias for fallible core operations
pub type ChessResult<T> = Result<T, ChessError>;

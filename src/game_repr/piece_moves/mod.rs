//! Pseudo-legal move enumeration. Nothing here knows about checks; the
//! [`threats`](super::threats) module filters the output down to legal moves.

pub mod king;
pub mod pawn;
pub mod stepping;

pub use king::*;
pub use pawn::*;
pub use stepping::*;

use super::{BoardView, Kind, MoveList, Piece, Square};

/// Which families of moves a generation call emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenFlags {
    /// Moves onto empty squares
    pub quiet: bool,
    /// Moves onto enemy pieces (and en passant)
    pub captures: bool,
    /// Same-team "re-occupation" pseudo-moves, used to measure protection
    pub defends: bool,
    /// Pawns report both diagonals whatever stands there, and never push.
    /// Used to build control maps.
    pub attack_map: bool,
}

impl GenFlags {
    /// Moves a player can actually make.
    pub const PLAY: GenFlags = GenFlags { quiet: true, captures: true, defends: false, attack_map: false };
    /// Every square a piece strikes, including those held by its own side.
    pub const CONTROL: GenFlags = GenFlags { quiet: true, captures: true, defends: true, attack_map: true };
    pub const CAPTURES: GenFlags = GenFlags { quiet: false, captures: true, defends: false, attack_map: false };
}

/// Number of whole `delta` steps from `origin` before leaving the board,
/// computed from the coordinates rather than by probing. A zero delta yields 0.
pub fn steps_to_edge(origin: Square, delta: (i8, i8)) -> u8 {
    fn axis(pos: i8, d: i8) -> Option<u8> {
        match d {
            0 => None,
            d if d > 0 => Some(((7 - pos) / d) as u8),
            d => Some((pos / -d) as u8),
        }
    }

    match (axis(origin.file(), delta.0), axis(origin.rank(), delta.1)) {
        (None, None) => 0,
        (Some(n), None) | (None, Some(n)) => n,
        (Some(a), Some(b)) => a.min(b),
    }
}

/// Pseudo-legal moves of `piece`, appended to `out`.
///
/// Kings only get their single steps here. Castling depends on threats and is
/// added by [`castling_moves`].
pub fn pseudo_moves<B: BoardView + ?Sized>(board: &B, piece: &Piece, flags: GenFlags, out: &mut MoveList) {
    match piece.kind {
        Kind::Pawn { .. } => pawn_moves(board, piece, flags, out),
        _ => pattern_moves(board, piece.square, piece.team, piece.piece_type().pattern(), flags, out),
    }
}

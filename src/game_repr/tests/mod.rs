use super::*;

// ==================== HELPER FUNCTIONS ====================

/// Parses a position, panicking on malformed test input.
pub fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap_or_else(|e| panic!("bad test position {fen:?}: {e}"))
}

pub fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

/// Whether the side to move has a legal move between the two named squares.
pub fn has_move(pos: &Position, from: &str, to: &str) -> bool {
    pos.find_move(sq(from), sq(to)).is_some()
}

/// Destinations of the piece on `from`, sorted for stable comparison.
pub fn destinations(pos: &Position, from: &str) -> Vec<String> {
    let mut out: Vec<String> = pos.legal_moves_from(sq(from)).map(|m| m.to.to_string()).collect();
    out.sort();
    out
}

pub fn count_move_type(pos: &Position, move_type: MoveType) -> usize {
    pos.legal_moves().iter().filter(|m| m.move_type == move_type).count()
}

/// Plays the legal move between two named squares.
pub fn play(pos: &Position, from: &str, to: &str) -> Position {
    let mv = pos
        .find_move(sq(from), sq(to))
        .unwrap_or_else(|| panic!("{from}->{to} is not legal in {}", pos.to_fen()));
    pos.play(mv).unwrap()
}

pub fn piece_on(pos: &Position, name: &str) -> Option<(Team, Type)> {
    pos.piece_at(sq(name)).map(|p| (p.team, p.piece_type()))
}

// ==================== TEST MODULES ====================

mod check_detection;
mod perft;

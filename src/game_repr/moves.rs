use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::Square;
use crate::error::ChessError;

/// What a move does. The discriminant is the digit used in serialized tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Quiet = 0,
    Capture = 1,
    EnPassant = 2,
    CastleKingside = 3,
    CastleQueenside = 4,
    /// Secondary rook relocation of a castling move. Never offered to a player.
    CastlingRookParticipation = 5,
    /// Same-side "re-occupation" used only to measure protection. Never applied.
    Defends = 6,
}

impl MoveType {
    pub fn from_digit(d: u8) -> Option<MoveType> {
        Some(match d {
            0 => MoveType::Quiet,
            1 => MoveType::Capture,
            2 => MoveType::EnPassant,
            3 => MoveType::CastleKingside,
            4 => MoveType::CastleQueenside,
            5 => MoveType::CastlingRookParticipation,
            6 => MoveType::Defends,
            _ => return None,
        })
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        matches!(self, MoveType::Capture | MoveType::EnPassant)
    }

    #[inline]
    pub fn is_castle(self) -> bool {
        matches!(self, MoveType::CastleKingside | MoveType::CastleQueenside)
    }
}

/// Immutable move descriptor: origin, destination and what kind of move it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub move_type: MoveType,
}

/// Move buffer used across generation and search.
pub type MoveList = SmallVec<[Move; 64]>;

impl Move {
    pub const fn new(from: Square, to: Square, move_type: MoveType) -> Move {
        Move { from, to, move_type }
    }

    /// Serialized token: origin, one type digit, destination (`e20e4`).
    pub fn token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, self.move_type as u8, self.to)
    }
}

impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ChessError::InvalidMoveToken(s.to_string());
        if s.len() != 5 || !s.is_ascii() {
            return Err(bad());
        }
        let from: Square = s[0..2].parse().map_err(|_| bad())?;
        let digit = s.as_bytes()[2].wrapping_sub(b'0');
        let move_type = MoveType::from_digit(digit).ok_or_else(bad)?;
        let to: Square = s[3..5].parse().map_err(|_| bad())?;
        Ok(Move::new(from, to, move_type))
    }
}

/// Joins tokens with `|`, the format of a cached forced plan.
pub fn serialize_line(moves: &[Move]) -> String {
    moves.iter().map(Move::token).collect::<Vec<_>>().join("|")
}

/// Parses a `|`-delimited plan. An empty string is an empty plan.
pub fn parse_line(line: &str) -> Result<Vec<Move>, ChessError> {
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split('|').map(str::parse).collect()
}

/// Parses a dash-delimited search path into moves.
pub fn parse_path(path: &str) -> Result<Vec<Move>, ChessError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    path.split('-').map(str::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_token_format() {
        let mv = Move::new(sq("e2"), sq("e4"), MoveType::Quiet);
        assert_eq!(mv.token(), "e20e4");
        let mv = Move::new(sq("e1"), sq("g1"), MoveType::CastleKingside);
        assert_eq!(mv.token(), "e13g1");
    }

    #[test]
    fn test_token_parse() {
        let mv: Move = "d51e6".parse().unwrap();
        assert_eq!(mv.from, sq("d5"));
        assert_eq!(mv.to, sq("e6"));
        assert_eq!(mv.move_type, MoveType::Capture);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for bad in ["", "e2e4", "e29e4", "z20e4", "e20e9", "e20e44", "é0e4"] {
            assert!(bad.parse::<Move>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_plan_line() {
        assert!(parse_line("a89b8|h10h8").is_err());
        assert!(parse_line("a80b8||h10h8").is_err());
        let line = "a80b8|h10h8";
        let moves = parse_line(line).unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(serialize_line(&moves), line);
        assert!(parse_line("").unwrap().is_empty());
    }
}

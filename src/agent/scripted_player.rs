//! Player replaying a fixed list of moves in coordinate notation.
//!
//! Useful for tests, reproducing reported games, and feeding opening lines
//! to engine matches. Tokens look like `e2e4`, with a trailing piece letter
//! for promotions (`a7a8n`).

use std::collections::VecDeque;
use std::time::Duration;

use crate::agent::player::Player;
use crate::error::{ChessError, ChessResult};
use crate::game_repr::{Move, Position, Square, Type};

/// One parsed coordinate token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Type>,
}

impl std::str::FromStr for ScriptedMove {
    type Err = ChessError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let bad = || ChessError::InvalidMoveToken(token.to_string());
        if !token.is_ascii() || !(4..=5).contains(&token.len()) {
            return Err(bad());
        }
        let from = token[0..2].parse().map_err(|_| bad())?;
        let to = token[2..4].parse().map_err(|_| bad())?;
        let promotion = match token[4..].chars().next() {
            None => None,
            Some(c) => Some(
                Type::from_symbol(c)
                    .filter(|t| t.is_promotion_target())
                    .ok_or_else(bad)?,
            ),
        };
        Ok(ScriptedMove { from, to, promotion })
    }
}

pub struct ScriptedPlayer {
    name: String,
    script: VecDeque<ScriptedMove>,
    /// Promotion of the move handed out last
    promotion: Option<Type>,
}

impl ScriptedPlayer {
    /// Parses a whitespace-separated list of tokens.
    ///
    /// # Errors
    ///
    /// `InvalidMoveToken` for the first token that is not a coordinate move.
    pub fn new(name: String, script: &str) -> ChessResult<Self> {
        let script = script
            .split_whitespace()
            .map(str::parse)
            .collect::<ChessResult<VecDeque<ScriptedMove>>>()?;
        Ok(Self { name, script, promotion: None })
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Player for ScriptedPlayer {
    /// Next scripted move, or `None` when the script is exhausted or the
    /// scripted move is not legal in `position`.
    fn get_move(&mut self, position: &Position, _budget: Option<Duration>) -> Option<Move> {
        let next = self.script.pop_front()?;
        match position.find_move(next.from, next.to) {
            Some(mv) => {
                self.promotion = next.promotion;
                Some(mv)
            }
            None => {
                log::warn!(
                    "[{}] scripted move {}{} is not legal in {}",
                    self.name,
                    next.from,
                    next.to,
                    position.to_fen()
                );
                None
            }
        }
    }

    fn promotion_choice(&mut self, _position: &Position, _mv: Move) -> Type {
        self.promotion.take().unwrap_or(Type::Queen)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        let mv: ScriptedMove = "e2e4".parse().unwrap();
        assert_eq!(mv.from.to_string(), "e2");
        assert_eq!(mv.to.to_string(), "e4");
        assert_eq!(mv.promotion, None);

        let promo: ScriptedMove = "a7a8N".parse().unwrap();
        assert_eq!(promo.promotion, Some(Type::Knight));

        assert!("e2e".parse::<ScriptedMove>().is_err());
        assert!("e2e9".parse::<ScriptedMove>().is_err());
        assert!("a7a8k".parse::<ScriptedMove>().is_err());
        assert!(ScriptedPlayer::new("x".into(), "e2e4 zz").is_err());
    }

    #[test]
    fn test_replays_script() {
        let mut player = ScriptedPlayer::new("Script".into(), "e2e4 g1f3").unwrap();
        let start = Position::default();
        let first = player.get_move(&start, None).unwrap();
        assert_eq!(first.to.to_string(), "e4");
        assert_eq!(player.remaining(), 1);
    }

    #[test]
    fn test_illegal_script_move_yields_none() {
        let mut player = ScriptedPlayer::new("Script".into(), "e2e5").unwrap();
        assert!(player.get_move(&Position::default(), None).is_none());
        assert!(player.get_move(&Position::default(), None).is_none());
    }

    #[test]
    fn test_promotion_piece_follows_token() {
        let position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mut player = ScriptedPlayer::new("Script".into(), "a7a8r").unwrap();
        let mv = player.get_move(&position, None).unwrap();
        assert!(position.is_promotion(&mv));
        assert_eq!(player.promotion_choice(&position, mv), Type::Rook);
    }
}

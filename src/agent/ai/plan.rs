//! Forced continuation remembered after the search finds a winning mate.

use std::collections::VecDeque;

use crate::error::ChessResult;
use crate::game_repr::{parse_line, serialize_line, Move};

/// Remaining moves of a forced line, alternating opponent reply and own move.
///
/// The first entry is always the reply the opponent is expected to make next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForcedPlan {
    moves: VecDeque<Move>,
}

impl ForcedPlan {
    /// Plan from a search path whose first move has just been played.
    pub fn from_path(path: &[Move]) -> Self {
        Self { moves: path.iter().skip(1).copied().collect() }
    }

    /// Parses a `|`-delimited token line.
    pub fn parse(line: &str) -> ChessResult<Self> {
        Ok(Self { moves: parse_line(line)?.into() })
    }

    pub fn serialize(&self) -> String {
        let moves: Vec<Move> = self.moves.iter().copied().collect();
        serialize_line(&moves)
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Reply the plan expects from the opponent.
    pub fn expects(&self) -> Option<Move> {
        self.moves.front().copied()
    }

    /// Checks the opponent's actual move against the plan.
    ///
    /// A matching move is consumed; anything else abandons the plan. Returns
    /// whether the plan survived.
    pub fn consume_opponent(&mut self, actual: Move) -> bool {
        if self.expects() == Some(actual) {
            self.moves.pop_front();
            true
        } else {
            self.moves.clear();
            false
        }
    }

    /// Our next planned move, if it is our turn in the plan.
    pub fn take_own(&mut self) -> Option<Move> {
        self.moves.pop_front()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}


use std::sync::Arc;

use crate::agent::ai::{EvaluationCache, SearchContext};
use crate::config::SearchLimits;
use crate::game_repr::{Move, Position, Square};

pub fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

pub fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

pub fn mv(token: &str) -> Move {
    token.parse().unwrap()
}

pub fn context(min_depth: u32, max_depth: u32) -> SearchContext {
    SearchContext::new(Arc::new(EvaluationCache::new()), SearchLimits::new(min_depth, max_depth))
}

/// White to move, mate in two: 1. Rh1 Kb8 2. Rh8# (or 1. Kc7 Ka7 2. Ra1#).
pub const MATE_IN_TWO: &str = "k7/8/1K6/8/8/8/8/1R6 w - - 0 1";

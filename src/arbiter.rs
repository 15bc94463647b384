//! Terminal-state classification.
//!
//! Every [`Position`] classifies itself on construction with [`classify_static`]
//! (mate, stalemate, fifty-move rule, dead material). Repetition needs the game
//! history, so the live game threads a [`GameContext`] through [`GameContext::classify`]
//! once per completed real move. Search nodes never touch the repetition table.

use std::collections::HashMap;

use crate::game_repr::{Position, Team, Type};

/// Halfmove clock value at which the game is drawn automatically.
pub const FIFTY_MOVE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress,
    WhiteWins,
    BlackWins,
    Stalemate,
    /// Fifty-move rule or insufficient material
    Draw,
    ThreefoldRepetition,
    FivefoldRepetition,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::Draw
                | GameStatus::ThreefoldRepetition
                | GameStatus::FivefoldRepetition
        )
    }

    pub fn winner(self) -> Option<Team> {
        match self {
            GameStatus::WhiteWins => Some(Team::White),
            GameStatus::BlackWins => Some(Team::Black),
            _ => None,
        }
    }

    pub fn win_for(team: Team) -> GameStatus {
        match team {
            Team::White => GameStatus::WhiteWins,
            _ => GameStatus::BlackWins,
        }
    }
}

/// Classification that needs nothing but the position itself.
pub fn classify_static(pos: &Position) -> GameStatus {
    if pos.legal_moves().is_empty() {
        return if pos.in_check() {
            GameStatus::win_for(pos.to_move().opponent())
        } else {
            GameStatus::Stalemate
        };
    }
    if pos.halfmove_clock() >= FIFTY_MOVE_LIMIT {
        return GameStatus::Draw;
    }
    if insufficient_material(pos) {
        return GameStatus::Draw;
    }
    GameStatus::InProgress
}

/// King vs king, king and one minor piece vs king, or king and bishop against
/// king and bishop with both bishops on the same square colour.
pub fn insufficient_material(pos: &Position) -> bool {
    let mut minors: [Vec<(Type, bool)>; 2] = [Vec::new(), Vec::new()];

    for piece in pos.pieces() {
        match piece.piece_type() {
            Type::King => {}
            Type::Knight | Type::Bishop => {
                minors[piece.team.index()].push((piece.piece_type(), piece.square.is_light()))
            }
            Type::Pawn | Type::Rook | Type::Queen => return false,
        }
    }

    match (minors[0].as_slice(), minors[1].as_slice()) {
        ([], []) => true,
        ([_], []) | ([], [_]) => true,
        ([(Type::Bishop, a)], [(Type::Bishop, b)]) => a == b,
        _ => false,
    }
}

/// Occurrence counts of short keys over the course of one game.
#[derive(Debug, Clone, Default)]
pub struct RepetitionTable {
    counts: HashMap<String, u8>,
}

impl RepetitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps the count of `key` and returns the new count.
    pub fn record(&mut self, key: &str) -> u8 {
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn count(&self, key: &str) -> u8 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Per-game arbiter state, owned by the single game-progression path.
#[derive(Debug, Clone, Default)]
pub struct GameContext {
    repetitions: RepetitionTable,
}

impl GameContext {
    /// Starts a game whose first position is `start`.
    pub fn new(start: &Position) -> Self {
        let mut repetitions = RepetitionTable::new();
        repetitions.record(start.short_key());
        Self { repetitions }
    }

    pub fn repetitions(&self) -> &RepetitionTable {
        &self.repetitions
    }

    /// Classifies `pos`, reached by a real move, in fixed priority order:
    /// repetition, then mate/stalemate, then the fifty-move rule, then material.
    pub fn classify(&mut self, pos: &Position) -> GameStatus {
        classify(pos, &mut self.repetitions)
    }
}

/// See [`GameContext::classify`].
pub fn classify(pos: &Position, occurrences: &mut RepetitionTable) -> GameStatus {
    match occurrences.record(pos.short_key()) {
        n if n >= 5 => GameStatus::FivefoldRepetition,
        n if n >= 3 => GameStatus::ThreefoldRepetition,
        _ => pos.status(),
    }
}

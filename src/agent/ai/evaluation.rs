// Static position evaluation
// Returns a score in pawns, positive = good for White

use super::board_control::{board_control, ControlMap};
use super::evaluation_cache::EvaluationCache;
use super::pawn_structure::pawn_structure;
use super::score::MATE_VALUE;
use crate::arbiter::GameStatus;
use crate::game_repr::{BoardView, Piece, Position, Square, Team, Type};

// Mobility: share of a piece's empty-board reach it actually has
const MOBILITY_WEIGHT: f64 = 0.3;
const MOBILITY_NEAR_KING_WEIGHT: f64 = 0.45;

// King safety
const DANGER_SQUARE_PENALTY: f64 = -0.1;
const UNCASTLED_BONUS: f64 = 0.2;
const CENTRALIZATION_WEIGHT: f64 = 0.1;

/// Non-pawn material per side below which the game counts as an endgame
const ENDGAME_MATERIAL: i32 = 13;

/// Material balance (P=1, N=B=3, R=5, Q=9)
fn material(pos: &Position) -> f64 {
    pos.pieces().map(Piece::value).sum::<i32>() as f64
}

/// Whether both sides are down to light non-pawn material.
pub fn is_endgame(pos: &Position) -> bool {
    [Team::White, Team::Black].into_iter().all(|team| {
        let heavy: i32 = pos
            .pieces_of(team)
            .filter(|p| !p.is(Type::Pawn))
            .map(|p| p.piece_type().value())
            .sum();
        heavy < ENDGAME_MATERIAL
    })
}

fn adjacent(a: Square, b: Square) -> bool {
    a != b && a.distance(b) == 1
}

/// Development of one side: every officer scores the share of its possible
/// destinations it has, more when one of them touches the enemy king.
fn mobility_of(pos: &Position, team: Team) -> f64 {
    let moves = pos.moves_for(team);
    let enemy_king = pos.king_square(team.opponent());

    pos.pieces_of(team)
        .filter(|p| !p.is(Type::Pawn) && !p.is(Type::King))
        .map(|piece| {
            let mut reach = 0u32;
            let mut near_king = false;
            for mv in moves.iter().filter(|m| m.from == piece.square) {
                reach += 1;
                near_king |= adjacent(mv.to, enemy_king);
            }
            let weight = if near_king { MOBILITY_NEAR_KING_WEIGHT } else { MOBILITY_WEIGHT };
            weight * reach as f64 / piece.piece_type().max_moves() as f64
        })
        .sum()
}

fn mobility(pos: &Position) -> f64 {
    mobility_of(pos, Team::White) - mobility_of(pos, Team::Black)
}

/// Chebyshev distance from the middle of the board, 0.5 (centre) to 3.5 (edge).
fn center_distance(sq: Square) -> f64 {
    let file = (sq.file() as f64 - 3.5).abs();
    let rank = (sq.rank() as f64 - 3.5).abs();
    file.max(rank)
}

fn king_safety_of(pos: &Position, team: Team, map: &ControlMap, endgame: bool) -> f64 {
    let king = pos.king_square(team);

    if endgame {
        return CENTRALIZATION_WEIGHT * (3.5 - center_distance(king));
    }

    let mut score = 0.0;
    for sq in Square::all().filter(|&sq| adjacent(sq, king)) {
        let exposed = pos.piece_at(sq).map_or(true, |p| p.team != team);
        if exposed && !map.covered_by(sq, team) {
            score += DANGER_SQUARE_PENALTY;
        }
    }

    let home = king.file() == 4 && king.rank() == team.home_rank();
    if home && !pos.castling_rights(team).is_empty() {
        score += UNCASTLED_BONUS;
    }
    score
}

fn king_safety(pos: &Position, map: &ControlMap) -> f64 {
    let endgame = is_endgame(pos);
    king_safety_of(pos, Team::White, map, endgame) - king_safety_of(pos, Team::Black, map, endgame)
}

/// Heuristic score without terminal checks or memoization.
pub fn full_evaluation(pos: &Position) -> f64 {
    let map = ControlMap::build(pos);
    material(pos) + mobility(pos) + board_control(pos, &map) + king_safety(pos, &map) + pawn_structure(pos)
}

/// Main evaluation function.
///
/// Finished games score ±[`MATE_VALUE`] or 0. Anything else is looked up in
/// `cache` by short key before falling back to [`full_evaluation`].
pub fn evaluate(pos: &Position, cache: &EvaluationCache) -> f64 {
    match pos.status() {
        GameStatus::WhiteWins => return MATE_VALUE,
        GameStatus::BlackWins => return -MATE_VALUE,
        GameStatus::InProgress => {}
        _ => return 0.0,
    }

    if let Some(value) = cache.get(pos.short_key()) {
        return value;
    }
    let value = full_evaluation(pos);
    cache.insert(pos.short_key(), value);
    value
}

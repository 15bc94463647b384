use super::GenFlags;
use crate::game_repr::{BoardView, Kind, Move, MoveList, MoveType, Piece, Team};

/// Pushes and diagonal captures of a pawn.
///
/// Pushes are only emitted with `quiet`; the double step requires an unmoved
/// pawn and two empty squares. A diagonal is a destination only when an enemy
/// stands there or the pawn beside us on the same rank just double-stepped.
pub fn pawn_moves<B: BoardView + ?Sized>(board: &B, pawn: &Piece, flags: GenFlags, out: &mut MoveList) {
    let team = pawn.team;
    let forward = team.forward();
    let origin = pawn.square;

    if flags.quiet && !flags.attack_map {
        if let Some(one) = origin.offset(0, forward) {
            if board.occupant_team(one) == Team::Empty {
                out.push(Move::new(origin, one, MoveType::Quiet));

                let unmoved = matches!(pawn.kind, Kind::Pawn { has_moved: false, .. });
                if unmoved {
                    if let Some(two) = one.offset(0, forward) {
                        if board.occupant_team(two) == Team::Empty {
                            out.push(Move::new(origin, two, MoveType::Quiet));
                        }
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(diagonal) = origin.offset(df, forward) else {
            continue;
        };
        match board.occupant_team(diagonal) {
            t if t == team => {
                if flags.defends {
                    out.push(Move::new(origin, diagonal, MoveType::Defends));
                }
            }
            t if t == team.opponent() => {
                if flags.captures {
                    out.push(Move::new(origin, diagonal, MoveType::Capture));
                }
            }
            _ => {
                let passing = origin
                    .offset(df, 0)
                    .and_then(|side| board.piece_at(side))
                    .is_some_and(|p| p.team == team.opponent() && p.is_en_passant_target());
                if passing && flags.captures {
                    out.push(Move::new(origin, diagonal, MoveType::EnPassant));
                } else if flags.attack_map && flags.quiet {
                    out.push(Move::new(origin, diagonal, MoveType::Quiet));
                }
            }
        }
    }
}

/// Rank a pawn of `team` promotes on.
pub const fn promotion_rank(team: Team) -> i8 {
    match team {
        Team::Black => 0,
        _ => 7,
    }
}

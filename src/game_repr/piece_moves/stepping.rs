use super::{steps_to_edge, GenFlags};
use crate::game_repr::{BoardView, Move, MoveList, MovePattern, MoveType, Square, Team};

/// Steps or slides from `origin` along every direction of `pattern`.
///
/// The walk length is fixed up front by [`steps_to_edge`], so each step lands
/// on the board by construction.
pub fn pattern_moves<B: BoardView + ?Sized>(
    board: &B,
    origin: Square,
    team: Team,
    pattern: MovePattern,
    flags: GenFlags,
    out: &mut MoveList,
) {
    for &(df, dr) in pattern.directions {
        let mut limit = steps_to_edge(origin, (df, dr));
        if !pattern.slides {
            limit = limit.min(1);
        }

        let mut sq = origin;
        for _ in 0..limit {
            sq = Square::from_index((sq.index() as i8 + dr * 8 + df) as usize);
            match board.occupant_team(sq) {
                Team::Empty => {
                    if flags.quiet {
                        out.push(Move::new(origin, sq, MoveType::Quiet));
                    }
                }
                t if t == team => {
                    if flags.defends {
                        out.push(Move::new(origin, sq, MoveType::Defends));
                    }
                    break;
                }
                _ => {
                    if flags.captures {
                        out.push(Move::new(origin, sq, MoveType::Capture));
                    }
                    break;
                }
            }
        }
    }
}

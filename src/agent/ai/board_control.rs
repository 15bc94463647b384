//! Square control: who strikes each square, and what that is worth.

use smallvec::SmallVec;

use super::exchange::static_exchange;
use crate::game_repr::piece_moves::{pseudo_moves, GenFlags};
use crate::game_repr::{BoardView, MoveList, Piece, Position, Square, Team, Type};

const CENTER_BONUS: f64 = 0.1;
const NEAR_CENTER_BONUS: f64 = 0.05;
/// Share of a hanging piece's exchange value charged when its own side is to move.
const HANGING_DISCOUNT: f64 = 0.3;

/// Every piece striking each square, own-side protection included.
pub struct ControlMap {
    controllers: Vec<SmallVec<[Piece; 4]>>,
    /// White strikes minus Black strikes
    tally: [i32; 64],
}

impl ControlMap {
    pub fn build(pos: &Position) -> Self {
        let mut controllers = vec![SmallVec::new(); 64];
        let mut tally = [0; 64];
        let mut moves = MoveList::new();

        for piece in pos.pieces() {
            moves.clear();
            pseudo_moves(pos, piece, GenFlags::CONTROL, &mut moves);
            for mv in &moves {
                let idx = mv.to.index();
                controllers[idx].push(*piece);
                tally[idx] += piece.team.sign();
            }
        }
        Self { controllers, tally }
    }

    pub fn controllers(&self, sq: Square) -> &[Piece] {
        &self.controllers[sq.index()]
    }

    pub fn tally(&self, sq: Square) -> i32 {
        self.tally[sq.index()]
    }

    /// Whether any piece of `team` other than its king strikes `sq`.
    pub fn covered_by(&self, sq: Square, team: Team) -> bool {
        self.controllers(sq)
            .iter()
            .any(|p| p.team == team && !p.is(Type::King))
    }
}

fn is_center(sq: Square) -> bool {
    (3..=4).contains(&sq.file()) && (3..=4).contains(&sq.rank())
}

fn is_near_center(sq: Square) -> bool {
    (2..=5).contains(&sq.file()) && (2..=5).contains(&sq.rank()) && !is_center(sq)
}

/// Control and hanging-piece score, positive for White.
///
/// An occupied square belongs to its occupant unless the exchange there goes
/// against it, in which case the material at stake is charged to the
/// occupant and the square goes to the other side. Empty squares go to
/// whichever side strikes them more often.
pub fn board_control(pos: &Position, map: &ControlMap) -> f64 {
    let mut score = 0.0;

    for sq in Square::all() {
        let owner = match pos.piece_at(sq) {
            // Kings are never exchanged; check is the king-safety term's business.
            Some(occupant) if occupant.is(Type::King) => occupant.team,
            Some(occupant) => {
                let lost = static_exchange(pos, sq, map.controllers(sq));
                if lost > 0 {
                    let at_stake = if pos.to_move() == occupant.team.opponent() {
                        lost as f64
                    } else {
                        lost as f64 * HANGING_DISCOUNT
                    };
                    score -= occupant.team.sign() as f64 * at_stake;
                    occupant.team.opponent()
                } else {
                    occupant.team
                }
            }
            None => match map.tally(sq).signum() {
                1 => Team::White,
                -1 => Team::Black,
                _ => Team::Empty,
            },
        };

        let bonus = if is_center(sq) {
            CENTER_BONUS
        } else if is_near_center(sq) {
            NEAR_CENTER_BONUS
        } else {
            0.0
        };
        score += owner.sign() as f64 * bonus;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_start_position_is_balanced() {
        let p = Position::default();
        let map = ControlMap::build(&p);
        assert!(board_control(&p, &map).abs() < 1e-9);
    }

    #[test]
    fn test_defends_are_tallied() {
        let p = Position::default();
        let map = ControlMap::build(&p);
        // d2 pawn is protected by queen, bishop, king and knight.
        let d2: Square = "d2".parse().unwrap();
        assert_eq!(map.tally(d2), 4);
        assert!(map.covered_by(d2, Team::White));
    }

    #[test]
    fn test_hanging_piece_is_charged() {
        // Black to move with the d5 knight loose against the d1 rook.
        let waiting = pos("4k3/8/8/3n4/8/8/8/3RK3 b - - 0 1");
        let exposed = pos("4k3/8/8/3n4/8/8/8/3RK3 w - - 0 1");
        let w = board_control(&waiting, &ControlMap::build(&waiting));
        let e = board_control(&exposed, &ControlMap::build(&exposed));
        assert!(e > w, "loose knight costs more when the rook is to move: {e} vs {w}");
        assert!(e > 2.5);
    }
}

//! Check, pin and legality logic.
//!
//! A threat is an enemy attack line striking a king. It is stored as the
//! attacker's square followed by every empty square between attacker and king,
//! so a move answers the check iff it lands on one of those squares.

use smallvec::SmallVec;

use super::piece_moves::{castling_moves, pseudo_moves, steps_to_edge, GenFlags};
use super::view::direction;
use super::{
    BoardView, Capabilities, Move, MoveList, MoveType, Overlay, Piece, Square, Team, Type,
    ALL_DIRS, KNIGHT_OFFSETS,
};

pub type Line = SmallVec<[Square; 7]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threat {
    pub attacker: Square,
    /// Attacker square first, then the squares up to (excluding) the target.
    pub line: Line,
}

impl Threat {
    #[inline]
    pub fn covers(&self, sq: Square) -> bool {
        self.line.contains(&sq)
    }
}

pub type Threats = SmallVec<[Threat; 2]>;

/// Capability an attacker needs to strike along `(df, dr)` from `distance` away.
fn strikes_along(piece: &Piece, dir: (i8, i8), distance: u8, target_team: Team) -> bool {
    let caps = piece.capabilities();
    let diagonal = dir.0 != 0 && dir.1 != 0;
    if diagonal && caps.contains(Capabilities::DIAGONAL) {
        return true;
    }
    if !diagonal && caps.contains(Capabilities::ORTHOGONAL) {
        return true;
    }
    if distance != 1 {
        return false;
    }
    if caps.contains(Capabilities::KING) {
        return true;
    }
    // Seen from the target, an attacking pawn sits one rank "ahead" of it.
    diagonal && caps.contains(Capabilities::PAWN) && dir.1 == target_team.forward()
}

/// Walks outward from `target` along every attack pattern and reports each
/// enemy of `team` whose first-found piece matches the pattern it was reached by.
fn scan<B: BoardView + ?Sized>(board: &B, target: Square, team: Team, first_only: bool) -> Threats {
    let enemy = team.opponent();
    let mut threats = Threats::new();

    for &dir in &ALL_DIRS {
        let mut line = Line::new();
        let mut sq = target;
        for step in 1..=steps_to_edge(target, dir) {
            sq = Square::from_index((sq.index() as i8 + dir.1 * 8 + dir.0) as usize);
            let Some(piece) = board.piece_at(sq) else {
                line.push(sq);
                continue;
            };
            if piece.team == enemy && strikes_along(piece, dir, step, team) {
                line.push(sq);
                line.reverse();
                threats.push(Threat { attacker: sq, line });
                if first_only {
                    return threats;
                }
            }
            break;
        }
    }

    for &(df, dr) in &KNIGHT_OFFSETS {
        let Some(sq) = target.offset(df, dr) else {
            continue;
        };
        if let Some(piece) = board.piece_at(sq) {
            if piece.team == enemy && piece.capabilities().contains(Capabilities::KNIGHT) {
                threats.push(Threat { attacker: sq, line: smallvec::smallvec![sq] });
                if first_only {
                    return threats;
                }
            }
        }
    }

    threats
}

/// Every enemy attack currently striking `target`, for a piece of `team` there.
pub fn find_threats<B: BoardView + ?Sized>(board: &B, target: Square, team: Team) -> Threats {
    scan(board, target, team, false)
}

/// Whether any enemy of `team` attacks `target`.
pub fn is_threatened<B: BoardView + ?Sized>(board: &B, target: Square, team: Team) -> bool {
    !scan(board, target, team, true).is_empty()
}

/// Squares a pinned piece may still move to (between king and pinner, pinner
/// included), or `None` when `piece` is not pinned.
pub fn pin_line<B: BoardView + ?Sized>(board: &B, piece: &Piece) -> Option<Line> {
    let king = board.king_of(piece.team);
    if !board.are_aligned(king, piece) {
        return None;
    }
    let dir = direction(king.square, piece.square);
    let mut line = Line::new();
    let mut passed_piece = false;
    let mut sq = king.square;

    for _ in 0..steps_to_edge(king.square, dir) {
        sq = Square::from_index((sq.index() as i8 + dir.1 * 8 + dir.0) as usize);
        if sq == piece.square {
            passed_piece = true;
            continue;
        }
        match board.piece_at(sq) {
            None => line.push(sq),
            Some(_) if !passed_piece => return None,
            Some(other) => {
                let slider = if dir.0 != 0 && dir.1 != 0 {
                    Capabilities::DIAGONAL
                } else {
                    Capabilities::ORTHOGONAL
                };
                if other.team == piece.team.opponent() && other.capabilities().contains(slider) {
                    line.push(sq);
                    return Some(line);
                }
                return None;
            }
        }
    }
    None
}

/// Legal moves of `piece`, appended to `out`. `threats` are the threats on its
/// own king, as computed by [`find_threats`].
pub fn legal_moves_for<B: BoardView + ?Sized>(board: &B, piece: &Piece, threats: &[Threat], out: &mut MoveList) {
    if piece.is(Type::King) {
        king_legal_moves(board, piece, threats, out);
        return;
    }
    // Double check: only the king may move.
    if threats.len() >= 2 {
        return;
    }

    let mut candidates = MoveList::new();
    pseudo_moves(board, piece, GenFlags::PLAY, &mut candidates);
    if candidates.is_empty() {
        return;
    }
    let pin = pin_line(board, piece);
    let king_sq = board.king_of(piece.team).square;

    for mv in candidates {
        if let Some(line) = pin.as_ref() {
            if !line.contains(&mv.to) {
                continue;
            }
        }
        let passed = en_passant_victim(&mv);
        let answers_checks = threats
            .iter()
            .all(|t| t.covers(mv.to) || passed.is_some_and(|v| t.attacker == v));
        if !answers_checks {
            continue;
        }
        if let Some(victim) = passed {
            // Both pawns leave the rank at once, which a pin test cannot see.
            let after = Overlay::new(board)
                .hiding(mv.from)
                .hiding(victim)
                .placing(Piece { square: mv.to, ..*piece });
            if is_threatened(&after, king_sq, piece.team) {
                continue;
            }
        }
        out.push(mv);
    }
}

fn king_legal_moves<B: BoardView + ?Sized>(board: &B, king: &Piece, threats: &[Threat], out: &mut MoveList) {
    let mut steps = MoveList::new();
    pseudo_moves(board, king, GenFlags::PLAY, &mut steps);

    let without_king = Overlay::new(board).hiding(king.square);
    for mv in steps {
        if !is_threatened(&without_king, mv.to, king.team) {
            out.push(mv);
        }
    }
    if threats.is_empty() {
        castling_moves(board, king, out);
    }
}

/// Square of the pawn removed by an en passant move.
pub fn en_passant_victim(mv: &Move) -> Option<Square> {
    if mv.move_type != MoveType::EnPassant {
        return None;
    }
    Square::new(mv.to.file(), mv.from.rank())
}

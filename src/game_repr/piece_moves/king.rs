use crate::game_repr::threats::is_threatened;
use crate::game_repr::{
    BoardView, CastlingRights, Kind, Move, MoveList, MoveType, Overlay, Piece, Square, Team,
};

/// Static description of one castling wing.
struct Wing {
    right: CastlingRights,
    move_type: MoveType,
    rook_file: i8,
    /// Files that must be empty between king and rook
    between: &'static [i8],
    /// Files the king crosses, destination included
    king_path: &'static [i8],
    king_to: i8,
    rook_to: i8,
}

const WINGS: [Wing; 2] = [
    Wing {
        right: CastlingRights::KINGSIDE,
        move_type: MoveType::CastleKingside,
        rook_file: 7,
        between: &[5, 6],
        king_path: &[5, 6],
        king_to: 6,
        rook_to: 5,
    },
    Wing {
        right: CastlingRights::QUEENSIDE,
        move_type: MoveType::CastleQueenside,
        rook_file: 0,
        between: &[1, 2, 3],
        king_path: &[3, 2],
        king_to: 2,
        rook_to: 3,
    },
];

const KING_FILE: i8 = 4;

/// Castling moves for `king`. The caller guarantees the king is not in check.
///
/// Requires the matching right on the king, an unmoved own rook in the corner,
/// empty squares between them, and no attacked square on the king's path.
pub fn castling_moves<B: BoardView + ?Sized>(board: &B, king: &Piece, out: &mut MoveList) {
    let rights = king.castling_rights();
    let home = king.team.home_rank();
    if rights.is_empty() || king.square.file() != KING_FILE || king.square.rank() != home {
        return;
    }

    // The king itself must not shield a square it walks onto.
    let without_king = Overlay::new(board).hiding(king.square);

    for wing in &WINGS {
        if !rights.contains(wing.right) {
            continue;
        }
        let rook_ready = square(wing.rook_file, home)
            .and_then(|sq| board.piece_at(sq))
            .is_some_and(|p| p.team == king.team && matches!(p.kind, Kind::Rook { has_moved: false }));
        if !rook_ready {
            continue;
        }
        let clear = wing
            .between
            .iter()
            .filter_map(|&f| square(f, home))
            .all(|sq| board.occupant_team(sq) == Team::Empty);
        if !clear {
            continue;
        }
        let safe = wing
            .king_path
            .iter()
            .filter_map(|&f| square(f, home))
            .all(|sq| !is_threatened(&without_king, sq, king.team));
        if !safe {
            continue;
        }
        if let Some(to) = square(wing.king_to, home) {
            out.push(Move::new(king.square, to, wing.move_type));
        }
    }
}

/// Secondary rook relocation of a castling move, or `None` for other moves.
pub fn rook_participation(mv: &Move) -> Option<Move> {
    let wing = match mv.move_type {
        MoveType::CastleKingside => &WINGS[0],
        MoveType::CastleQueenside => &WINGS[1],
        _ => return None,
    };
    let rank = mv.from.rank();
    Some(Move::new(
        square(wing.rook_file, rank)?,
        square(wing.rook_to, rank)?,
        MoveType::CastlingRookParticipation,
    ))
}

/// Corner the rook of `right` starts on.
pub fn rook_home(team: Team, right: CastlingRights) -> Option<Square> {
    let wing = WINGS.iter().find(|w| w.right == right)?;
    square(wing.rook_file, team.home_rank())
}

fn square(file: i8, rank: i8) -> Option<Square> {
    Square::new(file, rank)
}

//! Forsyth-Edwards notation in and out.
//!
//! Pawn and rook "has moved" flags are not part of the notation; they are
//! derived from the starting rank and the castling field respectively.

use std::fmt::Write as _;

use super::piece_moves::rook_home;
use super::threats::is_threatened;
use super::{CastlingRights, Kind, Piece, Position, Square, Team, Type};
use crate::error::{ChessError, ChessResult};

fn invalid(reason: impl Into<String>) -> ChessError {
    ChessError::fen(reason)
}

/// Parses all six fields. Missing or extra fields are rejected.
pub fn parse(fen_str: &str) -> ChessResult<Position> {
    let parts: Vec<&str> = fen_str.split_whitespace().collect();
    let [placement, side, castling, en_passant, halfmove, fullmove] = parts[..] else {
        return Err(invalid(format!("expected 6 fields, found {}", parts.len())));
    };

    let mut squares = parse_placement(placement)?;

    let to_move = match side {
        "w" => Team::White,
        "b" => Team::Black,
        other => return Err(invalid(format!("side to move '{other}'"))),
    };

    let kings = locate_kings(&squares)?;

    let rights = parse_castling(castling)?;
    apply_castling(&mut squares, &kings, rights);

    let en_passant = match en_passant {
        "-" => None,
        sq => Some(parse_en_passant(&mut squares, sq, to_move)?),
    };

    let halfmove_clock = parse_counter(halfmove, "halfmove clock")?;
    let fullmove_number = parse_counter(fullmove, "fullmove number")?;
    if fullmove_number == 0 {
        return Err(invalid("fullmove number 0"));
    }

    let pos = Position::assemble(squares, to_move, halfmove_clock, fullmove_number, en_passant, kings, None);

    let waiting = to_move.opponent();
    if is_threatened(&pos, pos.king_square(waiting), waiting) {
        return Err(invalid("side not to move is in check"));
    }
    Ok(pos)
}

fn parse_placement(placement: &str) -> ChessResult<[Option<Piece>; 64]> {
    let mut squares = [None; 64];
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid(format!("{} ranks in placement", ranks.len())));
    }

    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row as i8;
        let mut file: i8 = 0;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(invalid(format!("bad empty run '{c}'")));
                }
                file += skip as i8;
                if file > 8 {
                    return Err(invalid(format!("rank {} has more than 8 files", rank + 1)));
                }
                continue;
            }
            let piece_type = Type::from_symbol(c).ok_or_else(|| invalid(format!("unknown piece '{c}'")))?;
            let team = if c.is_ascii_uppercase() { Team::White } else { Team::Black };
            let square = Square::new(file, rank)
                .ok_or_else(|| invalid(format!("rank {} overflows", rank + 1)))?;

            let mut piece = Piece::new(team, square, piece_type);
            if piece_type == Type::Pawn {
                if rank == 0 || rank == 7 {
                    return Err(invalid(format!("pawn on {square}")));
                }
                let start_rank = team.home_rank() + team.forward();
                piece.kind = Kind::Pawn { has_moved: rank != start_rank, en_passant: false };
            }
            if piece_type == Type::Rook {
                piece.kind = Kind::Rook { has_moved: true };
            }
            squares[square.index()] = Some(piece);
            file += 1;
        }
        if file != 8 {
            return Err(invalid(format!("rank {} has {file} files", rank + 1)));
        }
    }
    Ok(squares)
}

fn locate_kings(squares: &[Option<Piece>; 64]) -> ChessResult<[Square; 2]> {
    let mut found: [Vec<Square>; 2] = [Vec::new(), Vec::new()];
    for piece in squares.iter().flatten().filter(|p| p.is(Type::King)) {
        found[piece.team.index()].push(piece.square);
    }
    match (found[0].as_slice(), found[1].as_slice()) {
        ([white], [black]) => Ok([*white, *black]),
        (w, b) => Err(invalid(format!("{} white and {} black kings", w.len(), b.len()))),
    }
}

fn parse_castling(field: &str) -> ChessResult<[CastlingRights; 2]> {
    let mut rights = [CastlingRights::NONE; 2];
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let (team, right) = match c {
            'K' => (Team::White, CastlingRights::KINGSIDE),
            'Q' => (Team::White, CastlingRights::QUEENSIDE),
            'k' => (Team::Black, CastlingRights::KINGSIDE),
            'q' => (Team::Black, CastlingRights::QUEENSIDE),
            _ => return Err(invalid(format!("castling flag '{c}'"))),
        };
        rights[team.index()] = rights[team.index()].with(right);
    }
    Ok(rights)
}

/// Hands each right to the king only when king and matching rook are at home,
/// marking that rook unmoved.
fn apply_castling(squares: &mut [Option<Piece>; 64], kings: &[Square; 2], rights: [CastlingRights; 2]) {
    for team in [Team::White, Team::Black] {
        let king_sq = kings[team.index()];
        if king_sq.file() != 4 || king_sq.rank() != team.home_rank() {
            continue;
        }
        let mut granted = CastlingRights::NONE;
        for right in [CastlingRights::KINGSIDE, CastlingRights::QUEENSIDE] {
            if !rights[team.index()].contains(right) {
                continue;
            }
            let Some(corner) = rook_home(team, right) else {
                continue;
            };
            if let Some(Piece { team: t, kind: kind @ Kind::Rook { .. }, .. }) = squares[corner.index()].as_mut() {
                if *t == team {
                    *kind = Kind::Rook { has_moved: false };
                    granted = granted.with(right);
                }
            }
        }
        if let Some(Piece { kind: Kind::King { rights }, .. }) = squares[king_sq.index()].as_mut() {
            *rights = granted;
        }
    }
}

/// Marks the pawn that just passed over `field` as capturable en passant.
fn parse_en_passant(squares: &mut [Option<Piece>; 64], field: &str, to_move: Team) -> ChessResult<Square> {
    let target: Square = field.parse().map_err(|_| invalid(format!("en passant square '{field}'")))?;
    let mover = to_move.opponent();
    let expected_rank = mover.home_rank() + 2 * mover.forward();
    if target.rank() != expected_rank {
        return Err(invalid(format!("en passant square {target} on wrong rank")));
    }
    let pawn_sq = target
        .offset(0, mover.forward())
        .ok_or_else(|| invalid("en passant square off board"))?;
    match squares[pawn_sq.index()].as_mut() {
        Some(Piece { team, kind: Kind::Pawn { en_passant, .. }, .. }) if *team == mover => {
            *en_passant = true;
            Ok(target)
        }
        _ => Err(invalid(format!("no pawn passed over {target}"))),
    }
}

fn parse_counter(text: &str, what: &str) -> ChessResult<u32> {
    text.parse().map_err(|_| invalid(format!("{what} '{text}'")))
}

/// Piece placement field only.
pub fn placement(pos: &Position) -> String {
    let mut out = String::with_capacity(72);
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            let Some(sq) = Square::new(file, rank) else {
                continue;
            };
            match pos.squares[sq.index()].as_ref() {
                None => empty += 1,
                Some(piece) => {
                    if empty > 0 {
                        let _ = write!(out, "{empty}");
                        empty = 0;
                    }
                    out.push(piece.symbol());
                }
            }
        }
        if empty > 0 {
            let _ = write!(out, "{empty}");
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

fn castling_field(pos: &Position) -> String {
    let mut out = String::new();
    for (team, k, q) in [(Team::White, 'K', 'Q'), (Team::Black, 'k', 'q')] {
        let rights = pos.castling_rights(team);
        if rights.contains(CastlingRights::KINGSIDE) {
            out.push(k);
        }
        if rights.contains(CastlingRights::QUEENSIDE) {
            out.push(q);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

fn side_char(team: Team) -> char {
    if team == Team::Black { 'b' } else { 'w' }
}

/// `"<placement> <side> <castling>"`, the identity used for repetition and caching.
pub fn short_key(pos: &Position) -> String {
    format!("{} {} {}", placement(pos), side_char(pos.to_move), castling_field(pos))
}

pub fn format(pos: &Position) -> String {
    let en_passant = pos.en_passant.map_or_else(|| "-".to_string(), |sq| sq.to_string());
    format!(
        "{} {} {} {} {} {}",
        placement(pos),
        side_char(pos.to_move),
        castling_field(pos),
        en_passant,
        pos.halfmove_clock,
        pos.fullmove_number
    )
}

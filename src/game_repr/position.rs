use once_cell::sync::Lazy;

use super::fen;
use super::piece_moves::{promotion_rank, rook_home, rook_participation};
use super::threats::{en_passant_victim, find_threats, legal_moves_for, Threats};
use super::*;
use crate::arbiter::{self, GameStatus};
use crate::error::{ChessError, ChessResult};

/*
 * A snapshot of one board state. Built either from notation or from a parent
 * plus exactly one move, then never mutated again.
 */

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Pieces a pawn may become, strongest first.
pub const PROMOTION_CHOICES: [Type; 4] = [Type::Queen, Type::Rook, Type::Bishop, Type::Knight];

static START: Lazy<Position> =
    Lazy::new(|| Position::from_fen(START_FEN).expect("standard start position parses"));

#[derive(Clone, Debug)]
pub struct Position {
    /// Mailbox, index = rank * 8 + file. Always 64 slots.
    pub(crate) squares: [Option<Piece>; 64],
    pub(crate) to_move: Team,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Square passed over by a pawn double step on the previous ply
    pub(crate) en_passant: Option<Square>,
    pub(crate) kings: [Square; 2],
    /// Attacks on the king of the side to move
    threats: Threats,
    legal_moves: MoveList,
    status: GameStatus,
    short_key: String,
    last_move: Option<Move>,
}

impl Default for Position {
    fn default() -> Self {
        START.clone()
    }
}

impl BoardView for Position {
    #[inline]
    fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.squares[sq.index()].as_ref()
    }

    fn king_of(&self, team: Team) -> &Piece {
        let sq = self.kings[team.index()];
        match self.squares[sq.index()].as_ref() {
            Some(king) if king.is(Type::King) && king.team == team => king,
            _ => panic!("{team:?} king missing from {sq}"),
        }
    }
}

impl Position {
    pub fn from_fen(fen_str: &str) -> ChessResult<Position> {
        fen::parse(fen_str)
    }

    pub fn to_fen(&self) -> String {
        fen::format(self)
    }

    /// Builds derived state (threats, legal moves, key, status) for a freshly
    /// assembled board. Every constructor funnels through here.
    pub(crate) fn assemble(
        squares: [Option<Piece>; 64],
        to_move: Team,
        halfmove_clock: u32,
        fullmove_number: u32,
        en_passant: Option<Square>,
        kings: [Square; 2],
        last_move: Option<Move>,
    ) -> Position {
        let mut pos = Position {
            squares,
            to_move,
            halfmove_clock,
            fullmove_number,
            en_passant,
            kings,
            threats: Threats::new(),
            legal_moves: MoveList::new(),
            status: GameStatus::InProgress,
            short_key: String::new(),
            last_move,
        };
        pos.threats = find_threats(&pos, pos.kings[to_move.index()], to_move);
        pos.legal_moves = pos.generate_legal(to_move, &pos.threats);
        pos.short_key = fen::short_key(&pos);
        pos.status = arbiter::classify_static(&pos);
        pos
    }

    fn generate_legal(&self, team: Team, threats: &[Threat]) -> MoveList {
        let mut moves = MoveList::new();
        for piece in self.pieces_of(team) {
            legal_moves_for(self, piece, threats, &mut moves);
        }
        moves
    }

    // ===========================
    // Queries
    // ===========================

    #[inline]
    pub fn to_move(&self) -> Team {
        self.to_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    /// Legal moves of the side to move.
    #[inline]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// Legal moves of one piece of the side to move.
    pub fn legal_moves_from(&self, from: Square) -> impl Iterator<Item = &Move> {
        self.legal_moves.iter().filter(move |m| m.from == from)
    }

    /// Looks up the legal move between two squares, if there is one.
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        self.legal_moves.iter().copied().find(|m| m.from == from && m.to == to)
    }

    /// Legal moves `team` would have if it were its turn. For the side to move
    /// this is the cached list.
    pub fn moves_for(&self, team: Team) -> MoveList {
        if team == self.to_move {
            return self.legal_moves.clone();
        }
        let threats = self.threats_on(team);
        self.generate_legal(team, &threats)
    }

    /// Attacks currently striking the king of `team`.
    pub fn threats_on(&self, team: Team) -> Threats {
        if team == self.to_move {
            return self.threats.clone();
        }
        find_threats(self, self.kings[team.index()], team)
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        !self.threats.is_empty()
    }

    pub fn threats(&self) -> &Threats {
        &self.threats
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Placement, side to move and castling rights: the repetition and cache key.
    #[inline]
    pub fn short_key(&self) -> &str {
        &self.short_key
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Rook relocation that accompanied the last move, if it castled.
    pub fn secondary_move(&self) -> Option<Move> {
        self.last_move.as_ref().and_then(rook_participation)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten()
    }

    pub fn pieces_of(&self, team: Team) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.team == team)
    }

    pub fn castling_rights(&self, team: Team) -> CastlingRights {
        self.king_of(team).castling_rights()
    }

    pub fn king_square(&self, team: Team) -> Square {
        self.kings[team.index()]
    }

    /// Whether `mv` would put a pawn on its last rank.
    pub fn is_promotion(&self, mv: &Move) -> bool {
        self.piece_at(mv.from)
            .is_some_and(|p| p.is(Type::Pawn) && mv.to.rank() == promotion_rank(p.team))
    }

    // ===========================
    // Move application
    // ===========================

    /// Plays a move from the legal list, promoting to a queen when needed.
    pub fn play(&self, mv: Move) -> ChessResult<Position> {
        self.play_promoting(mv, Type::Queen)
    }

    /// Plays a move from the legal list. `promotion` is only consulted when a
    /// pawn reaches its last rank.
    pub fn play_promoting(&self, mv: Move, promotion: Type) -> ChessResult<Position> {
        if !self.legal_moves.contains(&mv) {
            return Err(ChessError::IllegalMove(mv.token()));
        }
        if !promotion.is_promotion_target() {
            return Err(ChessError::InvalidPromotion(promotion));
        }
        Ok(self.child(mv, promotion))
    }

    /// Child position after `mv`. The move is trusted to be legal.
    ///
    /// # Panics
    ///
    /// Panics when the origin square is empty or holds a piece of the side not
    /// to move: both mean the caller is out of sync with the board.
    pub fn child(&self, mv: Move, promotion: Type) -> Position {
        let mover_team = self.to_move;
        let mut squares = self.squares;
        let mut kings = self.kings;

        let mut mover = match squares[mv.from.index()].take() {
            Some(p) if p.team == mover_team => p,
            Some(p) => panic!("{:?} cannot move {:?} on {}", mover_team, p, mv.from),
            None => panic!("no piece on {} for {}", mv.from, mv.token()),
        };

        // A double step may only be answered on the very next ply.
        if let Some(target) = self.en_passant {
            if let Some(sq) = target.offset(0, mover_team.opponent().forward()) {
                if let Some(Piece { kind: Kind::Pawn { en_passant, .. }, .. }) = squares[sq.index()].as_mut() {
                    *en_passant = false;
                }
            }
        }

        let victim_square = en_passant_victim(&mv).unwrap_or(mv.to);
        let captured = squares[victim_square.index()].take();
        if let Some(victim) = captured.as_ref() {
            assert!(victim.team != mover_team, "{} captures own piece", mv.token());
            assert!(!victim.is(Type::King), "{} captures a king", mv.token());
            if victim.is(Type::Rook) {
                revoke_rook_right(&mut squares, &kings, victim.team, victim.square);
            }
        }

        let resets_clock = captured.is_some() || mover.is(Type::Pawn);
        let mut en_passant = None;

        match &mut mover.kind {
            Kind::Pawn { has_moved, en_passant: just_doubled } => {
                *has_moved = true;
                *just_doubled = (mv.to.rank() - mv.from.rank()).abs() == 2;
                if *just_doubled {
                    en_passant = mv.from.offset(0, mover_team.forward());
                }
            }
            Kind::Rook { has_moved } => {
                *has_moved = true;
                revoke_rook_right(&mut squares, &kings, mover_team, mv.from);
            }
            Kind::King { rights } => {
                *rights = CastlingRights::NONE;
                kings[mover_team.index()] = mv.to;
            }
            _ => {}
        }

        if mover.is(Type::Pawn) && mv.to.rank() == promotion_rank(mover_team) {
            mover.kind = match promotion {
                Type::Rook => Kind::Rook { has_moved: true },
                other => Kind::fresh(other),
            };
        }
        mover.square = mv.to;
        squares[mv.to.index()] = Some(mover);

        if let Some(rook_move) = rook_participation(&mv) {
            let mut rook = squares[rook_move.from.index()]
                .take()
                .unwrap_or_else(|| panic!("castling without a rook on {}", rook_move.from));
            rook.square = rook_move.to;
            rook.kind = Kind::Rook { has_moved: true };
            squares[rook_move.to.index()] = Some(rook);
        }

        let fullmove_number = match mover_team {
            Team::Black => self.fullmove_number + 1,
            _ => self.fullmove_number,
        };
        let halfmove_clock = if resets_clock { 0 } else { self.halfmove_clock + 1 };

        Position::assemble(
            squares,
            mover_team.opponent(),
            halfmove_clock,
            fullmove_number,
            en_passant,
            kings,
            Some(mv),
        )
    }

    // ===========================
    // Verification helpers
    // ===========================

    /// Number of leaf positions `depth` plies below this one. Every promotion
    /// choice counts, so totals match published perft tables.
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        self.legal_moves
            .iter()
            .map(|&mv| self.perft_move(mv, depth))
            .sum()
    }

    fn perft_move(&self, mv: Move, depth: u32) -> u64 {
        let choices: &[Type] = if self.is_promotion(&mv) { &PROMOTION_CHOICES } else { &[Type::Queen] };
        if depth == 1 {
            return choices.len() as u64;
        }
        choices
            .iter()
            .map(|&promotion| self.child(mv, promotion).perft(depth - 1))
            .sum()
    }

    /// Perft split by root move, for debugging generator mismatches.
    pub fn divide(&self, depth: u32) -> Vec<(Move, u64)> {
        self.legal_moves
            .iter()
            .map(|&mv| (mv, self.perft_move(mv, depth.max(1))))
            .collect()
    }
}

/// Drops the castling right tied to a rook leaving (or being taken on) `from`.
fn revoke_rook_right(squares: &mut [Option<Piece>; 64], kings: &[Square; 2], team: Team, from: Square) {
    let right = if rook_home(team, CastlingRights::KINGSIDE) == Some(from) {
        CastlingRights::KINGSIDE
    } else if rook_home(team, CastlingRights::QUEENSIDE) == Some(from) {
        CastlingRights::QUEENSIDE
    } else {
        return;
    };
    if let Some(Piece { kind: Kind::King { rights }, .. }) = squares[kings[team.index()].index()].as_mut() {
        *rights = rights.without(right);
    }
}

use super::Square;

/// Side of a piece, plus two sentinels so that a square probe is total:
/// `Empty` for an unoccupied square and `Void` for a coordinate off the board.
///
/// The discriminants make the opponent of a side its arithmetic negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Team {
    Black = -1,
    Empty = 0,
    White = 1,
    Void = 2,
}

impl Team {
    #[inline]
    pub const fn opponent(self) -> Team {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
            other => other,
        }
    }

    /// +1 for White, -1 for Black, 0 for the sentinels.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Team::White => 1,
            Team::Black => -1,
            _ => 0,
        }
    }

    #[inline]
    pub const fn is_side(self) -> bool {
        matches!(self, Team::White | Team::Black)
    }

    /// Array slot for per-side tables.
    ///
    /// # Panics
    ///
    /// Panics for `Empty` and `Void`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Team::White => 0,
            Team::Black => 1,
            other => panic!("{other:?} has no per-side slot"),
        }
    }

    /// Rank direction pawns of this side advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Team::Black => -1,
            _ => 1,
        }
    }

    /// Zero-based back rank of this side.
    #[inline]
    pub const fn home_rank(self) -> i8 {
        match self {
            Team::Black => 7,
            _ => 0,
        }
    }
}

/// Piece variant without variant-specific state, used for capability lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Movement capabilities of a piece. Attack probes match the pattern a square
/// was reached through against these bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const ORTHOGONAL: Capabilities = Capabilities(1 << 0);
    pub const DIAGONAL: Capabilities = Capabilities(1 << 1);
    pub const KNIGHT: Capabilities = Capabilities(1 << 2);
    pub const KING: Capabilities = Capabilities(1 << 3);
    pub const PAWN: Capabilities = Capabilities(1 << 4);

    #[inline]
    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }
}

pub const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ALL_DIRS: [(i8, i8); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

/// Directions a piece moves in and whether it keeps going until blocked.
#[derive(Debug, Clone, Copy)]
pub struct MovePattern {
    pub directions: &'static [(i8, i8)],
    pub slides: bool,
}

impl Type {
    /// Material value in pawns. The king is not counted.
    pub const fn value(self) -> i32 {
        match self {
            Type::Pawn => 1,
            Type::Knight | Type::Bishop => 3,
            Type::Rook => 5,
            Type::Queen => 9,
            Type::King => 0,
        }
    }

    pub const fn capabilities(self) -> Capabilities {
        match self {
            Type::Pawn => Capabilities::PAWN,
            Type::Knight => Capabilities::KNIGHT,
            Type::Bishop => Capabilities::DIAGONAL,
            Type::Rook => Capabilities::ORTHOGONAL,
            Type::Queen => Capabilities::ORTHOGONAL.union(Capabilities::DIAGONAL),
            Type::King => Capabilities::KING,
        }
    }

    /// Stepping pattern. Pawns are special-cased by the generator and report
    /// no directions here.
    pub const fn pattern(self) -> MovePattern {
        match self {
            Type::Pawn => MovePattern { directions: &[], slides: false },
            Type::Knight => MovePattern { directions: &KNIGHT_OFFSETS, slides: false },
            Type::Bishop => MovePattern { directions: &DIAGONAL_DIRS, slides: true },
            Type::Rook => MovePattern { directions: &ORTHOGONAL_DIRS, slides: true },
            Type::Queen => MovePattern { directions: &ALL_DIRS, slides: true },
            Type::King => MovePattern { directions: &ALL_DIRS, slides: false },
        }
    }

    /// Most destinations the piece can reach from any square of an empty board.
    pub const fn max_moves(self) -> u32 {
        match self {
            Type::Pawn => 4,
            Type::Knight => 8,
            Type::Bishop => 13,
            Type::Rook => 14,
            Type::Queen => 27,
            Type::King => 8,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Type::Pawn => 'p',
            Type::Knight => 'n',
            Type::Bishop => 'b',
            Type::Rook => 'r',
            Type::Queen => 'q',
            Type::King => 'k',
        }
    }

    pub fn from_symbol(c: char) -> Option<Type> {
        match c.to_ascii_lowercase() {
            'p' => Some(Type::Pawn),
            'n' => Some(Type::Knight),
            'b' => Some(Type::Bishop),
            'r' => Some(Type::Rook),
            'q' => Some(Type::Queen),
            'k' => Some(Type::King),
            _ => None,
        }
    }

    pub const fn is_promotion_target(self) -> bool {
        matches!(self, Type::Knight | Type::Bishop | Type::Rook | Type::Queen)
    }
}

/// Castling rights still held by a king. Rights are only ever removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const KINGSIDE: CastlingRights = CastlingRights(1 << 0);
    pub const QUEENSIDE: CastlingRights = CastlingRights(1 << 1);
    pub const BOTH: CastlingRights = CastlingRights(0b11);

    #[inline]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn without(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 & !other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub(crate) const fn with(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 | other.0)
    }
}

/// Piece variant together with the state only that variant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Pawn { has_moved: bool, en_passant: bool },
    Knight,
    Bishop,
    Rook { has_moved: bool },
    Queen,
    King { rights: CastlingRights },
}

impl Kind {
    pub const fn piece_type(self) -> Type {
        match self {
            Kind::Pawn { .. } => Type::Pawn,
            Kind::Knight => Type::Knight,
            Kind::Bishop => Type::Bishop,
            Kind::Rook { .. } => Type::Rook,
            Kind::Queen => Type::Queen,
            Kind::King { .. } => Type::King,
        }
    }

    /// Fresh state for a piece of type `t`: unmoved, no castling rights.
    pub const fn fresh(t: Type) -> Kind {
        match t {
            Type::Pawn => Kind::Pawn { has_moved: false, en_passant: false },
            Type::Knight => Kind::Knight,
            Type::Bishop => Kind::Bishop,
            Type::Rook => Kind::Rook { has_moved: false },
            Type::Queen => Kind::Queen,
            Type::King => Kind::King { rights: CastlingRights::NONE },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub team: Team,
    pub square: Square,
    pub kind: Kind,
}

impl Piece {
    pub const fn new(team: Team, square: Square, piece_type: Type) -> Piece {
        Piece { team, square, kind: Kind::fresh(piece_type) }
    }

    #[inline]
    pub const fn piece_type(&self) -> Type {
        self.kind.piece_type()
    }

    #[inline]
    pub const fn is(&self, piece_type: Type) -> bool {
        self.kind.piece_type() as u8 == piece_type as u8
    }

    /// Material value signed by team.
    #[inline]
    pub const fn value(&self) -> i32 {
        self.piece_type().value() * self.team.sign()
    }

    #[inline]
    pub const fn capabilities(&self) -> Capabilities {
        self.piece_type().capabilities()
    }

    /// Pawns that just made a double step can be taken en passant.
    pub const fn is_en_passant_target(&self) -> bool {
        matches!(self.kind, Kind::Pawn { en_passant: true, .. })
    }

    pub const fn castling_rights(&self) -> CastlingRights {
        match self.kind {
            Kind::King { rights } => rights,
            _ => CastlingRights::NONE,
        }
    }

    /// FEN letter, uppercase for White.
    pub fn symbol(&self) -> char {
        let c = self.piece_type().symbol();
        if self.team == Team::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_negation() {
        for team in [Team::White, Team::Black, Team::Empty] {
            assert_eq!(team.opponent() as i8, -(team as i8));
        }
        assert_eq!(Team::Void.opponent(), Team::Void);
    }

    #[test]
    fn test_signed_value() {
        let sq = Square::from_index(0);
        assert_eq!(Piece::new(Team::White, sq, Type::Queen).value(), 9);
        assert_eq!(Piece::new(Team::Black, sq, Type::Rook).value(), -5);
        assert_eq!(Piece::new(Team::Black, sq, Type::King).value(), 0);
    }

    #[test]
    fn test_castling_rights_only_shrink() {
        let rights = CastlingRights::BOTH.without(CastlingRights::KINGSIDE);
        assert!(rights.contains(CastlingRights::QUEENSIDE));
        assert!(!rights.contains(CastlingRights::KINGSIDE));
        assert!(rights.without(CastlingRights::QUEENSIDE).is_empty());
    }

    #[test]
    fn test_queen_has_both_slides() {
        let caps = Type::Queen.capabilities();
        assert!(caps.contains(Capabilities::ORTHOGONAL));
        assert!(caps.contains(Capabilities::DIAGONAL));
        assert!(!caps.contains(Capabilities::KNIGHT));
    }
}

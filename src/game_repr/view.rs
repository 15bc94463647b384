use super::{Piece, Square, Team};

/// The read-only board capabilities move generation and threat detection rely on.
///
/// Both the search [`Position`](super::Position) and temporary overlays used for
/// legality probes implement this; generators never see anything else.
pub trait BoardView {
    fn piece_at(&self, sq: Square) -> Option<&Piece>;

    /// # Panics
    ///
    /// Panics if `team` has no king, which no valid board allows.
    fn king_of(&self, team: Team) -> &Piece;

    fn occupant_team(&self, sq: Square) -> Team {
        self.piece_at(sq).map_or(Team::Empty, |p| p.team)
    }

    /// Team found one `(d_file, d_rank)` step away from `from`, `Void` off board.
    fn probe(&self, from: Square, d_file: i8, d_rank: i8) -> Team {
        from.offset(d_file, d_rank)
            .map_or(Team::Void, |sq| self.occupant_team(sq))
    }

    /// Whether two pieces share a rank, file or diagonal.
    fn are_aligned(&self, a: &Piece, b: &Piece) -> bool {
        aligned(a.square, b.square)
    }
}

pub fn aligned(a: Square, b: Square) -> bool {
    if a == b {
        return false;
    }
    let df = b.file() - a.file();
    let dr = b.rank() - a.rank();
    df == 0 || dr == 0 || df.abs() == dr.abs()
}

/// Unit step from `a` towards `b`. Only meaningful for aligned squares.
pub fn direction(a: Square, b: Square) -> (i8, i8) {
    ((b.file() - a.file()).signum(), (b.rank() - a.rank()).signum())
}

/// A board seen with up to two squares emptied and one piece dropped in,
/// used to ask "would this square be attacked after the move?".
pub struct Overlay<'a, B: BoardView + ?Sized> {
    base: &'a B,
    hidden: [Option<Square>; 2],
    placed: Option<Piece>,
}

impl<'a, B: BoardView + ?Sized> Overlay<'a, B> {
    pub fn new(base: &'a B) -> Self {
        Self { base, hidden: [None, None], placed: None }
    }

    pub fn hiding(mut self, sq: Square) -> Self {
        if self.hidden[0].is_none() {
            self.hidden[0] = Some(sq);
        } else {
            self.hidden[1] = Some(sq);
        }
        self
    }

    pub fn placing(mut self, piece: Piece) -> Self {
        self.placed = Some(piece);
        self
    }
}

impl<B: BoardView + ?Sized> BoardView for Overlay<'_, B> {
    fn piece_at(&self, sq: Square) -> Option<&Piece> {
        if let Some(placed) = self.placed.as_ref() {
            if placed.square == sq {
                return Some(placed);
            }
        }
        if self.hidden.contains(&Some(sq)) {
            return None;
        }
        self.base.piece_at(sq)
    }

    fn king_of(&self, team: Team) -> &Piece {
        match self.placed.as_ref() {
            Some(p) if p.team == team && p.is(super::Type::King) => p,
            _ => self.base.king_of(team),
        }
    }
}

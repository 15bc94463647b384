use std::fmt;
use std::str::FromStr;

use crate::error::ChessError;

/// A board coordinate. Files and ranks are zero based, so `a1` is `(0, 0)` and
/// `h8` is `(7, 7)`. Index layout matches the mailbox: `idx = rank * 8 + file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Validating constructor. Returns `None` off the board.
    pub const fn new(file: i8, rank: i8) -> Option<Square> {
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            return None;
        }
        Some(Square { file: file as u8, rank: rank as u8 })
    }

    /// # Panics
    ///
    /// Panics if `idx` is not in `0..64`.
    pub const fn from_index(idx: usize) -> Square {
        assert!(idx < 64, "square index out of bounds");
        Square { file: (idx % 8) as u8, rank: (idx / 8) as u8 }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    #[inline]
    pub const fn file(self) -> i8 {
        self.file as i8
    }

    #[inline]
    pub const fn rank(self) -> i8 {
        self.rank as i8
    }

    /// Translate by `(d_file, d_rank)`. `None` when the result leaves the board.
    #[inline]
    pub const fn offset(self, d_file: i8, d_rank: i8) -> Option<Square> {
        Square::new(self.file as i8 + d_file, self.rank as i8 + d_rank)
    }

    /// Light squares are those where file + rank is odd (a1 is dark).
    pub const fn is_light(self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    /// Chebyshev distance, the number of king steps between two squares.
    pub fn distance(self, other: Square) -> i8 {
        (self.file() - other.file())
            .abs()
            .max((self.rank() - other.rank()).abs())
    }

    /// All 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a') as i8;
        let rank = bytes[1].wrapping_sub(b'1') as i8;
        Square::new(file, rank).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
    }
}

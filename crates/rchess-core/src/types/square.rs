//! Board squares
//!
//! Little-endian rank-file mapping: a1 = 0, b1 = 1, ..., h8 = 63.

use std::fmt;

use super::Color;

/// A square on the board (0..64)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(u8);

macro_rules! define_squares {
    ($($name:ident = $idx:expr),* $(,)?) => {
        impl Square {
            $(pub const $name: Square = Square($idx);)*
        }
    };
}

define_squares!(
    A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
    A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
);

impl Square {
    /// Number of squares
    pub const NUM: usize = 64;

    /// Build from file (0 = a) and rank (0 = first rank)
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    /// Build from a raw index
    #[inline]
    pub const fn from_index(index: usize) -> Square {
        debug_assert!(index < Self::NUM);
        Square(index as u8)
    }

    /// Raw index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File, 0 = a
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    /// Rank, 0 = first rank
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// Rank as seen from `color` (white's first rank is black's eighth)
    #[inline]
    pub const fn relative_rank(self, color: Color) -> u8 {
        match color {
            Color::White => self.rank(),
            Color::Black => 7 - self.rank(),
        }
    }

    /// Mirror vertically (a1 <-> a8)
    #[inline]
    pub const fn flip_rank(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Square shifted by `delta`; the caller guarantees the result is on the board
    #[inline]
    pub const fn offset(self, delta: i8) -> Square {
        let idx = self.0 as i8 + delta;
        debug_assert!(idx >= 0 && idx < 64);
        Square(idx as u8)
    }

    /// Single-bit mask
    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// Parse algebraic notation ("e4")
    pub fn parse(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Square::new(file, rank))
        } else {
            None
        }
    }

    /// Iterate a1..h8
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_file_rank() {
        assert_eq!(Square::E4.file(), 4);
        assert_eq!(Square::E4.rank(), 3);
        assert_eq!(Square::new(4, 3), Square::E4);
        assert_eq!(Square::H8.index(), 63);
    }

    #[test]
    fn test_square_relative_rank() {
        assert_eq!(Square::E2.relative_rank(Color::White), 1);
        assert_eq!(Square::E7.relative_rank(Color::Black), 1);
        assert_eq!(Square::A8.relative_rank(Color::Black), 0);
    }

    #[test]
    fn test_square_parse_display() {
        assert_eq!(Square::parse("e4"), Some(Square::E4));
        assert_eq!(Square::parse("h8"), Some(Square::H8));
        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("a9"), None);
        assert_eq!(Square::parse("e"), None);
        assert_eq!(Square::C6.to_string(), "c6");
    }

    #[test]
    fn test_square_flip_and_offset() {
        assert_eq!(Square::A1.flip_rank(), Square::A8);
        assert_eq!(Square::E2.offset(16), Square::E4);
        assert_eq!(Square::D7.offset(-8), Square::D6);
    }
}

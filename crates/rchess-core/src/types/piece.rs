//! Piece types

use super::Color;

/// Kind of piece, independent of color
///
/// Discriminants are packed into moves (3 bits), so `0` is reserved for "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceType {
    /// Array size for tables indexed by piece type (slot 0 unused)
    pub const NUM: usize = 7;

    /// All piece types, pawn first
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Non-pawn, non-king pieces
    pub const MINORS_AND_MAJORS: [PieceType; 4] =
        [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decode a packed 3-bit value; 0 and 7 decode to `None`
    #[inline]
    pub const fn from_index(index: usize) -> Option<PieceType> {
        match index {
            1 => Some(PieceType::Pawn),
            2 => Some(PieceType::Knight),
            3 => Some(PieceType::Bishop),
            4 => Some(PieceType::Rook),
            5 => Some(PieceType::Queen),
            6 => Some(PieceType::King),
            _ => None,
        }
    }

    /// Bishop, rook or queen
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Rook | PieceType::Queen)
    }

    /// FEN letter (upper case for white)
    pub const fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a FEN letter into color and type
    pub const fn from_char(c: char) -> Option<(Color, PieceType)> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let pt = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some((color, pt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_type_chars() {
        assert_eq!(PieceType::Knight.to_char(Color::White), 'N');
        assert_eq!(PieceType::Queen.to_char(Color::Black), 'q');
        assert_eq!(PieceType::from_char('K'), Some((Color::White, PieceType::King)));
        assert_eq!(PieceType::from_char('p'), Some((Color::Black, PieceType::Pawn)));
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_piece_type_from_index() {
        assert_eq!(PieceType::from_index(0), None);
        assert_eq!(PieceType::from_index(4), Some(PieceType::Rook));
        assert_eq!(PieceType::from_index(7), None);
        for pt in PieceType::ALL {
            assert_eq!(PieceType::from_index(pt.index()), Some(pt));
        }
    }
}

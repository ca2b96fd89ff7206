//! Packed move encoding
//!
//! ```text
//! bits  0..6   from square
//! bits  6..12  to square
//! bits 12..15  moving piece type
//! bits 15..18  captured piece type (0 = none)
//! bit  18      promotion flag
//! bits 19..22  move kind
//! ```
//!
//! All 22 bits fit the move field of a transposition entry.

use std::fmt;

use super::{PieceType, Square};

/// Special-move type stored in bits 19..22
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    DoublePawnPush = 1,
    EnPassant = 2,
    Castling = 3,
    PromotionKnight = 4,
    PromotionBishop = 5,
    PromotionRook = 6,
    PromotionQueen = 7,
}

impl MoveKind {
    #[inline]
    const fn from_bits(bits: u32) -> MoveKind {
        match bits & 7 {
            0 => MoveKind::Normal,
            1 => MoveKind::DoublePawnPush,
            2 => MoveKind::EnPassant,
            3 => MoveKind::Castling,
            4 => MoveKind::PromotionKnight,
            5 => MoveKind::PromotionBishop,
            6 => MoveKind::PromotionRook,
            _ => MoveKind::PromotionQueen,
        }
    }

    /// Promotion kind for a target piece type
    #[inline]
    pub const fn promotion(pt: PieceType) -> MoveKind {
        match pt {
            PieceType::Knight => MoveKind::PromotionKnight,
            PieceType::Bishop => MoveKind::PromotionBishop,
            PieceType::Rook => MoveKind::PromotionRook,
            _ => MoveKind::PromotionQueen,
        }
    }
}

/// A move packed into 32 bits
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Move(u32);

impl Move {
    /// No move
    pub const NONE: Move = Move(0);

    /// Number of significant bits
    pub const BITS: u32 = 22;

    const FROM_SHIFT: u32 = 0;
    const TO_SHIFT: u32 = 6;
    const PIECE_SHIFT: u32 = 12;
    const CAPTURED_SHIFT: u32 = 15;
    const PROMOTION_SHIFT: u32 = 18;
    const KIND_SHIFT: u32 = 19;

    /// Build a move; `captured` is `None` for non-captures (en passant passes `Some(Pawn)`)
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        piece: PieceType,
        captured: Option<PieceType>,
        kind: MoveKind,
    ) -> Move {
        let captured_bits = match captured {
            Some(pt) => pt as u32,
            None => 0,
        };
        let promo = (kind as u32 >= MoveKind::PromotionKnight as u32) as u32;
        Move((from.index() as u32) << Self::FROM_SHIFT
            | (to.index() as u32) << Self::TO_SHIFT
            | (piece as u32) << Self::PIECE_SHIFT
            | captured_bits << Self::CAPTURED_SHIFT
            | promo << Self::PROMOTION_SHIFT
            | (kind as u32) << Self::KIND_SHIFT)
    }

    /// Rebuild from the raw 22-bit value (e.g. read back from the transposition table)
    #[inline]
    pub const fn from_raw(raw: u32) -> Move {
        Move(raw & ((1 << Self::BITS) - 1))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 >> Self::FROM_SHIFT & 63) as usize)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index((self.0 >> Self::TO_SHIFT & 63) as usize)
    }

    /// Moving piece type. Only meaningful for `is_some()` moves.
    #[inline]
    pub const fn piece(self) -> PieceType {
        match PieceType::from_index((self.0 >> Self::PIECE_SHIFT & 7) as usize) {
            Some(pt) => pt,
            None => PieceType::Pawn,
        }
    }

    /// Raw moving-piece field (0 for `NONE`)
    #[inline]
    pub const fn piece_index(self) -> usize {
        (self.0 >> Self::PIECE_SHIFT & 7) as usize
    }

    #[inline]
    pub const fn captured(self) -> Option<PieceType> {
        PieceType::from_index((self.0 >> Self::CAPTURED_SHIFT & 7) as usize)
    }

    /// Raw captured-piece field (0 = none)
    #[inline]
    pub const fn captured_index(self) -> usize {
        (self.0 >> Self::CAPTURED_SHIFT & 7) as usize
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_bits(self.0 >> Self::KIND_SHIFT)
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured_index() != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 >> Self::PROMOTION_SHIFT & 1 != 0
    }

    /// Neither a capture nor a promotion
    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    /// Promotion target, if any
    #[inline]
    pub const fn promotion_type(self) -> Option<PieceType> {
        match self.kind() {
            MoveKind::PromotionKnight => Some(PieceType::Knight),
            MoveKind::PromotionBishop => Some(PieceType::Bishop),
            MoveKind::PromotionRook => Some(PieceType::Rook),
            MoveKind::PromotionQueen => Some(PieceType::Queen),
            _ => None,
        }
    }

    /// Knight or queen promotions are always generated; rook and bishop only on request
    #[inline]
    pub const fn is_under_promotion(self) -> bool {
        matches!(self.kind(), MoveKind::PromotionBishop | MoveKind::PromotionRook)
    }

    /// Pawn move landing on the mover's 7th or 8th rank
    #[inline]
    pub const fn is_pawn_push_78(self) -> bool {
        if !matches!(self.piece(), PieceType::Pawn) {
            return false;
        }
        let (from_rank, to_rank) = (self.from().rank(), self.to().rank());
        if to_rank > from_rank { to_rank >= 6 } else { to_rank <= 1 }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(pt) = self.promotion_type() {
            write!(f, "{}", pt.to_char(super::Color::Black))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_fields() {
        let mv = Move::new(Square::E2, Square::E4, PieceType::Pawn, None, MoveKind::DoublePawnPush);
        assert_eq!(mv.from(), Square::E2);
        assert_eq!(mv.to(), Square::E4);
        assert_eq!(mv.piece(), PieceType::Pawn);
        assert_eq!(mv.captured(), None);
        assert_eq!(mv.kind(), MoveKind::DoublePawnPush);
        assert!(mv.is_quiet());
        assert!(!mv.is_promotion());
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn test_move_capture_promotion() {
        let mv = Move::new(
            Square::B7,
            Square::A8,
            PieceType::Pawn,
            Some(PieceType::Rook),
            MoveKind::PromotionQueen,
        );
        assert!(mv.is_capture());
        assert!(mv.is_promotion());
        assert!(!mv.is_quiet());
        assert_eq!(mv.captured(), Some(PieceType::Rook));
        assert_eq!(mv.promotion_type(), Some(PieceType::Queen));
        assert_eq!(mv.to_string(), "b7a8q");
        assert!(mv.raw() < 1 << Move::BITS);
        assert_eq!(Move::from_raw(mv.raw()), mv);
    }

    #[test]
    fn test_move_under_promotion() {
        let rook = Move::new(Square::A7, Square::A8, PieceType::Pawn, None, MoveKind::PromotionRook);
        let knight =
            Move::new(Square::A7, Square::A8, PieceType::Pawn, None, MoveKind::PromotionKnight);
        assert!(rook.is_under_promotion());
        assert!(!knight.is_under_promotion());
    }

    #[test]
    fn test_move_pawn_push_78() {
        let white = Move::new(Square::C6, Square::C7, PieceType::Pawn, None, MoveKind::Normal);
        let black = Move::new(Square::C3, Square::C2, PieceType::Pawn, None, MoveKind::Normal);
        let early = Move::new(Square::C2, Square::C3, PieceType::Pawn, None, MoveKind::Normal);
        let knight = Move::new(Square::C6, Square::B8, PieceType::Knight, None, MoveKind::Normal);
        assert!(white.is_pawn_push_78());
        assert!(black.is_pawn_push_78());
        assert!(!early.is_pawn_push_78());
        assert!(!knight.is_pawn_push_78());
    }

    #[test]
    fn test_move_none() {
        assert!(Move::NONE.is_none());
        assert_eq!(Move::NONE.to_string(), "0000");
        assert_eq!(Move::NONE.piece_index(), 0);
    }
}

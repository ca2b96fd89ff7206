//! Piece values and game-phase weights

use crate::types::PieceType;

/// Centipawn value per piece type (index 0 unused). The king value is only used
/// by static exchange evaluation when a capture would take the king.
pub const MATERIAL: [i32; PieceType::NUM] = [0, 100, 398, 438, 710, 1380, 3000];

/// Phase contribution per piece type
pub const PHASE: [i32; PieceType::NUM] = [0, 0, 9, 10, 20, 40, 0];

/// Phase of the initial position
pub const TOTAL_PHASE: i32 = 2 * (2 * PHASE[2] + 2 * PHASE[3] + 2 * PHASE[4] + PHASE[5]);

#[inline]
pub const fn material(pt: PieceType) -> i32 {
    MATERIAL[pt as usize]
}

//! Reversible per-ply state

use crate::bitboard::Bitboard;
use crate::types::Square;

/// Castling right bits
pub const WHITE_OO: u8 = 1;
pub const WHITE_OOO: u8 = 2;
pub const BLACK_OO: u8 = 4;
pub const BLACK_OOO: u8 = 8;
pub const ALL_CASTLING: u8 = 15;

/// State that `do_move` overwrites and `undo_move` restores wholesale
///
/// Board arrays, material, phase and PSQT are reversed by replaying the piece
/// operations instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateInfo {
    /// Zobrist key of the whole position
    pub key: u64,
    /// Zobrist key over pawns only
    pub pawn_key: u64,
    /// Castling-rights nibble
    pub castling: u8,
    /// En-passant target, only set when a pawn of the side to move can capture
    pub ep_square: Option<Square>,
    /// Plies since the last capture or pawn move
    pub halfmove_clock: u32,
    /// Plies since the last null move
    pub plies_from_null: u32,
    /// Enemy pieces giving check to the side to move
    pub checkers: Bitboard,
    /// Side-to-move pieces pinned to their own king
    pub pinned: Bitboard,
    /// Side-to-move pieces whose departure uncovers a check on the enemy king
    pub discovered: Bitboard,
}

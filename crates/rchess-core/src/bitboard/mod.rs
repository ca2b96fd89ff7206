//! Bitboard module
//!
//! The 64 squares map onto the bits of a `u64` (a1 = bit 0, h8 = bit 63).
//!
//! - `Bitboard`: set of squares with bit operations and iteration
//! - step attacks for knight, king and pawns (`const` tables)
//! - `between_bb` / `line_bb` / `pinned_movement_bb` line tables
//! - magic-multiplication sliding attacks for bishop, rook and queen

mod core;
mod magic;
mod tables;

pub use core::Bitboard;
pub use core::BitboardIter;
pub use magic::*;
pub use tables::*;

//! Position module
//!
//! The mutable board used by search threads.
//!
//! - `Position`: piece bitboards, piece index, side to move, king squares,
//!   material signature, phase and PSQT sums
//! - `StateInfo`: keys, castling rights, en passant, clocks and the
//!   checker / pinned / discovered caches, kept on a history stack
//! - `do_move` / `undo_move` / `do_null_move` with fully incremental updates
//! - legality (`is_legal`, `is_valid_move`), repetition, draw by material
//! - FEN parsing and output
//!
//! Board arrays, bitboards and keys are only changed through the piece
//! operations in `pos.rs`, which keep them consistent with each other.

mod checks;
mod do_move;
mod draw;
mod fen;
pub mod kpk;
mod legality;
mod pos;
mod state;
mod zobrist;

pub use pos::{Position, START_FEN, material_shift};
pub use state::{ALL_CASTLING, BLACK_OO, BLACK_OOO, StateInfo, WHITE_OO, WHITE_OOO};
pub use zobrist::{Zobrist, zobrist};

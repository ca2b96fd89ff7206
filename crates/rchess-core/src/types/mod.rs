//! Basic types shared by every module

mod bound;
mod color;
mod moves;
mod piece;
mod square;
mod value;

pub use bound::Bound;
pub use color::Color;
pub use moves::{Move, MoveKind};
pub use piece::PieceType;
pub use square::Square;
pub use value::Value;

/// Search depth in plies
pub type Depth = i32;

/// Maximum search ply (recursion depth, killer/frame arrays)
pub const MAX_PLY: usize = 64;

/// Upper bound on legal moves in any position
pub const MAX_MOVES: usize = 256;

/// Per-thread move buffer shared by all plies of one search
pub const MAX_MOVE_BUFFER: usize = MAX_PLY * MAX_MOVES;

/// Maximum number of search threads
pub const MAX_THREADS: usize = 64;

/// Longest principal variation reported
pub const PV_LENGTH: usize = 12;

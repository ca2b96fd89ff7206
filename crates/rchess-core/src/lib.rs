//! # rchess-core
//!
//! Bitboard chess engine core: position, move generation, alpha-beta search
//! and a lock-free transposition table shared by lazy SMP threads.
//!
//! ## Modules
//!
//! - `types`: Color, Square, PieceType, Move, Value, Bound
//! - `bitboard`: bitboards, attack tables, magic sliders
//! - `position`: board state, do_move/undo_move, FEN, draw rules
//! - `movegen`: move generation and perft
//! - `see`: static exchange evaluation
//! - `eval`: `Evaluator` trait and the material + PSQT evaluator
//! - `tt`: transposition table
//! - `search`: negamax, quiescence, move ordering, pruning, time control
//! - `parallel`: lazy SMP coordinator
//! - `engine`: `Engine`, `SearchHandle`, `SearchListener`

// Board
pub mod bitboard;
pub mod position;
pub mod types;

// Moves
pub mod movegen;
pub mod see;

// Evaluation
pub mod eval;

// Search
pub mod search;
pub mod tt;
mod parallel;

// Front
pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineOptions;
pub use engine::{Engine, NullListener, SearchHandle, SearchInfo, SearchListener, SearchOutcome};
pub use error::{ConfigError, EngineError, FenError, MoveParseError};
pub use eval::{Evaluator, MaterialPsqtEvaluator};
pub use position::Position;
pub use search::{PruneToggles, SearchLimits};
pub use tt::TranspositionTable;
pub use types::{Bound, Color, Depth, Move, PieceType, Square, Value};

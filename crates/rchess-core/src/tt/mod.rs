//! Transposition table
//!
//! - `TtEntry`: decoded entry (move, score, depth, bound)
//! - `TranspositionTable`: buckets of `BUCKET_SIZE` lock-free entries
//! - generation ("aged depth") and mate-distance adjustment
//! - prefetch
//!
//! Each entry is two `AtomicU64` words: the packed data and `key ^ data`.
//! A torn write between threads fails the XOR check and reads as a miss.

mod entry;
mod table;

pub use entry::TtEntry;
pub use table::TranspositionTable;

/// Entries per bucket
pub const BUCKET_SIZE: usize = 4;

/// Largest accepted table size in megabytes
pub const MAX_HASH_MB: usize = 16384;

/// Default table size in megabytes
pub const DEFAULT_HASH_MB: usize = 16;

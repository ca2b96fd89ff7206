//! TranspositionTable
//!
//! - Bucket: `BUCKET_SIZE` entries on one cache line
//! - probe / store
//! - resize / clear / hashfull

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use log::debug;

use super::entry::{self, TtEntry};
use super::{BUCKET_SIZE, MAX_HASH_MB};
use crate::error::ConfigError;
use crate::types::{Bound, Depth, Move, Value};

/// Entries are (key ^ data, data) word pairs
#[repr(C, align(64))]
#[derive(Default)]
struct Bucket {
    words: [AtomicU64; BUCKET_SIZE * 2],
}

const _: () = assert!(std::mem::size_of::<Bucket>() == 64);

impl Bucket {
    #[inline]
    fn load(&self, slot: usize) -> (u64, u64) {
        let check = self.words[slot * 2].load(Ordering::Relaxed);
        let data = self.words[slot * 2 + 1].load(Ordering::Relaxed);
        (check ^ data, data)
    }

    #[inline]
    fn write(&self, slot: usize, key: u64, data: u64) {
        self.words[slot * 2].store(key ^ data, Ordering::Relaxed);
        self.words[slot * 2 + 1].store(data, Ordering::Relaxed);
    }

    fn clear(&self) {
        for word in &self.words {
            word.store(0, Ordering::Relaxed);
        }
    }
}

/// Buckets per megabyte
const BUCKETS_PER_MB: usize = 1024 * 1024 / std::mem::size_of::<Bucket>();

/// Buckets sampled by `hashfull` (1000 entries)
const HASHFULL_BUCKETS: usize = 1000 / BUCKET_SIZE;

/// Shared transposition table
pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    /// log2 of the bucket count
    bits: u32,
    size_mb: usize,
    /// Half-move counter of the current search
    generation: AtomicU32,
}

impl TranspositionTable {
    /// Reject sizes that are not a power of two in `1..=MAX_HASH_MB`
    pub fn validate_size(mb: usize) -> Result<(), ConfigError> {
        if mb == 0 || mb > MAX_HASH_MB || !mb.is_power_of_two() {
            return Err(ConfigError::HashSize { value: mb, max: MAX_HASH_MB });
        }
        Ok(())
    }

    /// New table of `mb` megabytes
    pub fn new(mb: usize) -> Result<Self, ConfigError> {
        Self::validate_size(mb)?;
        let count = mb * BUCKETS_PER_MB;
        debug!("allocating transposition table: {mb} MB, {count} buckets");
        Ok(Self {
            buckets: Self::allocate(count),
            bits: count.trailing_zeros(),
            size_mb: mb,
            generation: AtomicU32::new(0),
        })
    }

    fn allocate(count: usize) -> Vec<Bucket> {
        let mut buckets = Vec::with_capacity(count);
        buckets.resize_with(count, Bucket::default);
        buckets
    }

    /// Reallocate when the size changes; returns whether it did
    pub fn resize(&mut self, mb: usize) -> Result<bool, ConfigError> {
        Self::validate_size(mb)?;
        if mb == self.size_mb {
            return Ok(false);
        }
        let count = mb * BUCKETS_PER_MB;
        debug!("resizing transposition table: {} MB -> {mb} MB", self.size_mb);
        self.buckets = Self::allocate(count);
        self.bits = count.trailing_zeros();
        self.size_mb = mb;
        Ok(true)
    }

    #[inline]
    pub fn size_mb(&self) -> usize {
        self.size_mb
    }

    /// Total entry capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Zero every entry. Large tables are split across threads.
    pub fn clear(&self) {
        let len = self.buckets.len();
        let threads = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);

        if threads <= 1 || len < threads * 1024 {
            self.buckets.iter().for_each(Bucket::clear);
            return;
        }

        let chunk = len.div_ceil(threads);
        std::thread::scope(|scope| {
            for part in self.buckets.chunks(chunk) {
                scope.spawn(move || part.iter().for_each(Bucket::clear));
            }
        });
    }

    /// Set the generation; called between searches with the game's half-move counter
    pub fn new_search(&self, half_move_counter: u32) {
        self.generation.store(half_move_counter, Ordering::Relaxed);
    }

    #[inline]
    pub fn generation(&self) -> u16 {
        self.generation.load(Ordering::Relaxed) as u16
    }

    #[inline]
    fn bucket(&self, key: u64) -> &Bucket {
        // bits == 0 only for a single bucket
        let index = if self.bits == 0 { 0 } else { (key >> (64 - self.bits)) as usize };
        &self.buckets[index]
    }

    /// Look up `key`
    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        let bucket = self.bucket(key);
        (0..BUCKET_SIZE).find_map(|slot| {
            let (stored_key, data) = bucket.load(slot);
            (data != 0 && stored_key == key).then(|| TtEntry::decode(data, self.generation()))
        })
    }

    /// Store a search result.
    ///
    /// Replacement order: the same key (unless a deeper entry would be
    /// replaced by a shallower non-exact one), an empty slot, then the slot
    /// with the lowest aged depth.
    pub fn store(&self, key: u64, score: Value, ply: i32, depth: Depth, bound: Bound, mv: Move) {
        debug_assert!(bound != Bound::None);
        let generation = self.generation();
        let bucket = self.bucket(key);
        let depth_of = |data: u64| entry::aged_depth(data).wrapping_sub(generation) as i16 as Depth;

        let mut replace = 0;
        let mut replaced_depth = Depth::MAX;
        for slot in 0..BUCKET_SIZE {
            let (stored_key, data) = bucket.load(slot);
            if data == 0 {
                replace = slot;
                break;
            }
            let stored_depth = depth_of(data);
            if stored_key == key {
                if stored_depth > depth && bound != Bound::Exact {
                    return;
                }
                replace = slot;
                break;
            }
            if stored_depth < replaced_depth {
                replace = slot;
                replaced_depth = stored_depth;
            }
        }

        let aged = (depth.clamp(i16::MIN as i32, i16::MAX as i32) as i16 as u16).wrapping_add(generation);
        let data = entry::pack(mv, entry::score_to_tt(score, ply), aged, bound);
        bucket.write(replace, key, data);
    }

    /// Permille of used entries among the first 1000
    pub fn hashfull(&self) -> u32 {
        self.buckets
            .iter()
            .take(HASHFULL_BUCKETS)
            .map(|bucket| (0..BUCKET_SIZE).filter(|&slot| bucket.load(slot).1 != 0).count() as u32)
            .sum::<u32>()
            * 1000
            / (HASHFULL_BUCKETS.min(self.buckets.len()) * BUCKET_SIZE) as u32
    }

    /// Pull the bucket for `key` into cache
    #[inline]
    pub fn prefetch(&self, key: u64) {
        let bucket = self.bucket(key);

        #[cfg(target_arch = "x86_64")]
        unsafe {
            use std::arch::x86_64::{_MM_HINT_T0, _mm_prefetch};
            _mm_prefetch::<_MM_HINT_T0>(bucket as *const Bucket as *const i8);
        }

        #[cfg(not(target_arch = "x86_64"))]
        let _ = bucket;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MoveKind, PieceType, Square};

    fn some_move() -> Move {
        Move::new(Square::G1, Square::F3, PieceType::Knight, None, MoveKind::Normal)
    }

    #[test]
    fn test_validate_size() {
        assert!(TranspositionTable::validate_size(1).is_ok());
        assert!(TranspositionTable::validate_size(16384).is_ok());
        assert!(TranspositionTable::validate_size(0).is_err());
        assert!(TranspositionTable::validate_size(3).is_err());
        assert!(TranspositionTable::validate_size(32768).is_err());
    }

    #[test]
    fn test_store_and_probe() {
        let tt = TranspositionTable::new(1).unwrap();
        let key = 0x1234_5678_9ABC_DEF0;
        assert!(tt.probe(key).is_none());
        tt.store(key, Value::new(42), 3, 7, Bound::Exact, some_move());
        let entry = tt.probe(key).unwrap();
        assert_eq!(entry.score(3), Value::new(42));
        assert_eq!(entry.depth(), 7);
        assert_eq!(entry.bound(), Bound::Exact);
        assert_eq!(entry.mv(), some_move());
        assert!(tt.probe(key ^ 1).is_none());
    }

    #[test]
    fn test_deeper_entry_kept_against_shallow_bound() {
        let tt = TranspositionTable::new(1).unwrap();
        let key = 0xDEAD_BEEF_0000_0001;
        tt.store(key, Value::new(10), 0, 8, Bound::Lower, some_move());
        tt.store(key, Value::new(99), 0, 2, Bound::Upper, Move::NONE);
        assert_eq!(tt.probe(key).unwrap().depth(), 8);
        // An exact result always replaces
        tt.store(key, Value::new(99), 0, 2, Bound::Exact, Move::NONE);
        let entry = tt.probe(key).unwrap();
        assert_eq!(entry.depth(), 2);
        assert_eq!(entry.score(0), Value::new(99));
    }

    #[test]
    fn test_lowest_depth_evicted_when_bucket_full() {
        let tt = TranspositionTable::new(1).unwrap();
        // Same top bits, so all land in bucket 0
        let keys = [1u64, 2, 3, 4];
        for (i, &key) in keys.iter().enumerate() {
            tt.store(key, Value::ZERO, 0, 10 - i as Depth, Bound::Exact, Move::NONE);
        }
        tt.store(5, Value::ZERO, 0, 9, Bound::Exact, Move::NONE);
        assert!(tt.probe(4).is_none());
        for key in [1, 2, 3, 5] {
            assert!(tt.probe(key).is_some(), "key {key}");
        }
    }

    #[test]
    fn test_generation_ages_depth() {
        let tt = TranspositionTable::new(1).unwrap();
        tt.new_search(10);
        tt.store(77, Value::ZERO, 0, 6, Bound::Exact, Move::NONE);
        tt.new_search(14);
        assert_eq!(tt.probe(77).unwrap().depth(), 2);
    }

    #[test]
    fn test_clear_and_hashfull() {
        let tt = TranspositionTable::new(1).unwrap();
        assert_eq!(tt.hashfull(), 0);
        for key in 0..4u64 {
            tt.store(key, Value::ZERO, 0, 1, Bound::Exact, Move::NONE);
        }
        assert_eq!(tt.hashfull(), 4);
        tt.clear();
        assert_eq!(tt.hashfull(), 0);
        assert!(tt.probe(1).is_none());
    }

    #[test]
    fn test_resize_only_on_change() {
        let mut tt = TranspositionTable::new(1).unwrap();
        assert_eq!(tt.resize(1), Ok(false));
        assert_eq!(tt.resize(2), Ok(true));
        assert_eq!(tt.capacity(), 2 * BUCKETS_PER_MB * BUCKET_SIZE);
        assert!(tt.resize(5).is_err());
        assert_eq!(tt.size_mb(), 2);
    }
}

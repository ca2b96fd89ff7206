//! Per-thread evaluation caches
//!
//! Direct-mapped, always-replace tables owned by one search thread, so they
//! need no synchronisation. A slot keeps the full key; a lookup hits only on
//! an exact key match.

/// Entries of the full-evaluation cache (Zobrist key)
pub const EVAL_CACHE_BITS: u32 = 12;
/// Entries of the pawn-structure cache (pawn key)
pub const PAWN_CACHE_BITS: u32 = 12;
/// Entries of the material cache (material signature)
pub const MATERIAL_CACHE_BITS: u32 = 11;

/// Direct-mapped cache from a 64-bit key to a small value
pub struct KeyedCache<V> {
    entries: Box<[Option<(u64, V)>]>,
    shift: u32,
    hits: u64,
    misses: u64,
}

impl<V: Copy> KeyedCache<V> {
    pub fn new(bits: u32) -> Self {
        debug_assert!((1..32).contains(&bits));
        Self { entries: vec![None; 1 << bits].into_boxed_slice(), shift: 64 - bits, hits: 0, misses: 0 }
    }

    /// Material signatures are small packed counts, so every key is spread
    /// before taking the top bits
    #[inline]
    fn slot(&self, key: u64) -> usize {
        (key.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> self.shift) as usize
    }

    #[inline]
    pub fn get(&mut self, key: u64) -> Option<V> {
        match self.entries[self.slot(key)] {
            Some((stored, value)) if stored == key => {
                self.hits += 1;
                Some(value)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    #[inline]
    pub fn insert(&mut self, key: u64, value: V) {
        let slot = self.slot(key);
        self.entries[slot] = Some((key, value));
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.hits = 0;
        self.misses = 0;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

/// The caches one search thread hands to the evaluator
pub struct EvalCaches {
    /// Final score from the side to move, by Zobrist key
    pub eval: KeyedCache<i32>,
    /// `(mg, eg)` pawn-structure score from white, by pawn key
    pub pawns: KeyedCache<(i32, i32)>,
    /// Material balance from white, by material signature
    pub material: KeyedCache<i32>,
}

impl EvalCaches {
    pub fn new() -> Self {
        Self {
            eval: KeyedCache::new(EVAL_CACHE_BITS),
            pawns: KeyedCache::new(PAWN_CACHE_BITS),
            material: KeyedCache::new(MATERIAL_CACHE_BITS),
        }
    }

    pub fn clear(&mut self) {
        self.eval.clear();
        self.pawns.clear();
        self.material.clear();
    }
}

impl Default for EvalCaches {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss() {
        let mut cache = KeyedCache::<i32>::new(4);
        assert_eq!(cache.get(42), None);
        cache.insert(42, -17);
        assert_eq!(cache.get(42), Some(-17));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_zero_key_is_not_a_hit_when_empty() {
        let mut cache = KeyedCache::<i32>::new(4);
        assert_eq!(cache.get(0), None);
        cache.insert(0, 5);
        assert_eq!(cache.get(0), Some(5));
    }

    #[test]
    fn test_colliding_key_replaces() {
        let mut cache = KeyedCache::<i32>::new(1);
        // Two slots: some pair among three keys must share one
        let keys = [1u64, 2, 3];
        for &k in &keys {
            cache.insert(k, k as i32);
        }
        let present = keys.iter().filter(|&&k| cache.get(k) == Some(k as i32)).count();
        assert!(present <= 2);
        assert_eq!(cache.get(3), Some(3));
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut caches = EvalCaches::new();
        caches.material.insert(7, 100);
        assert_eq!(caches.material.get(7), Some(100));
        caches.clear();
        assert_eq!(caches.material.get(7), None);
        assert_eq!((caches.material.hits(), caches.material.misses()), (0, 1));
    }
}

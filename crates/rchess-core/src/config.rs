//! Engine options

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::search::PruneToggles;
use crate::tt::{DEFAULT_HASH_MB, TranspositionTable};
use crate::types::MAX_THREADS;

/// Options applied between searches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Transposition table size in MB (power of two)
    pub hash_mb: usize,
    /// Search threads, main thread included
    pub threads: usize,
    /// Report a ponder move with the best move
    pub ponder: bool,
    /// Search rook and bishop promotions too
    pub under_promotions: bool,
    pub pruning: PruneToggles,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hash_mb: DEFAULT_HASH_MB,
            threads: 1,
            ponder: false,
            under_promotions: false,
            pruning: PruneToggles::default(),
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        TranspositionTable::validate_size(self.hash_mb)?;
        validate_threads(self.threads)
    }
}

pub(crate) fn validate_threads(threads: usize) -> Result<(), ConfigError> {
    if (1..=MAX_THREADS).contains(&threads) {
        Ok(())
    } else {
        Err(ConfigError::Threads { value: threads, max: MAX_THREADS })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineOptions::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let opts = EngineOptions { hash_mb: 24, ..Default::default() };
        assert!(matches!(opts.validate(), Err(ConfigError::HashSize { value: 24, .. })));
        let opts = EngineOptions { threads: 0, ..Default::default() };
        assert!(matches!(opts.validate(), Err(ConfigError::Threads { value: 0, .. })));
        let opts = EngineOptions { threads: MAX_THREADS + 1, ..Default::default() };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: EngineOptions =
            serde_json::from_str(r#"{"threads": 4, "pruning": {"null_move": false}}"#).unwrap();
        assert_eq!(opts.threads, 4);
        assert_eq!(opts.hash_mb, DEFAULT_HASH_MB);
        assert!(!opts.pruning.null_move);
        assert!(opts.pruning.futility);
    }
}

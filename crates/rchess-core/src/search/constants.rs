//! Search tuning constants

use std::sync::LazyLock;

use crate::types::{Depth, MAX_PLY};

/// Static null move margin per depth
pub const STATIC_NULL_MOVE_MARGIN: [i32; 7] = [0, 60, 130, 210, 300, 400, 510];

/// Razoring margin per depth
pub const RAZORING_MARGIN: [i32; 4] = [0, 240, 280, 300];

/// Futility margin per depth
pub const FUTILITY_MARGIN: [i32; 7] = [0, 80, 170, 270, 380, 500, 630];

/// Late move pruning applies up to this depth
pub const LMP_MAX_DEPTH: Depth = 4;

/// SEE pruning applies up to this depth
pub const SEE_PRUNING_MAX_DEPTH: Depth = 6;

/// Moves ordered at or above this score are never pruned
pub const PRUNING_ORDER_SCORE_LIMIT: i32 = 100;

/// Ordering score above which a reduced move gets one ply back
pub const LMR_GOOD_HISTORY: i32 = 40;

/// Half-width of the first aspiration window
pub const ASPIRATION_WINDOW_DELTA: i32 = 20;

/// Aspiration windows start at this depth
pub const ASPIRATION_MIN_DEPTH: Depth = 6;

/// No aspiration window around scores this large
pub const ASPIRATION_MAX_SCORE: i32 = 1000;

/// Quiescence delta pruning margin
pub const Q_FUTILITY_MARGIN: i32 = 150;

/// Lazy SMP: helper `i` skips ahead every `SMP_SKIP_DEPTHS[(i - 1) % 16]` depths ...
pub const SMP_SKIP_DEPTHS: [Depth; 16] = [1, 1, 2, 2, 2, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4];

/// ... by this many plies
pub const SMP_SKIP_AMOUNT: [Depth; 16] = [1, 2, 1, 2, 3, 1, 2, 3, 4, 5, 1, 2, 3, 4, 5, 6];

/// Nodes between stop-condition checks of the node limit
pub const NODE_CHECK_INTERVAL: u64 = 1024;

/// Base reduction by `[depth][move_number]`
static LMR_TABLE: LazyLock<[[u8; MAX_PLY]; MAX_PLY]> = LazyLock::new(|| {
    let mut table = [[0u8; MAX_PLY]; MAX_PLY];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (move_number, cell) in row.iter_mut().enumerate().skip(1) {
            let r = 0.6 + (depth as f64).ln() * (move_number as f64 * 1.2).ln() / 2.5;
            *cell = r.max(0.0) as u8;
        }
    }
    table
});

/// Base late move reduction before the per-move adjustments
#[inline]
pub fn lmr_base(depth: Depth, move_number: usize) -> Depth {
    let d = (depth.max(0) as usize).min(MAX_PLY - 1);
    let m = move_number.min(MAX_PLY - 1);
    LMR_TABLE[d][m] as Depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lmr_table_monotone() {
        assert_eq!(lmr_base(1, 1), 0);
        assert!(lmr_base(10, 20) >= lmr_base(10, 5));
        assert!(lmr_base(20, 10) >= lmr_base(5, 10));
        // Out-of-range lookups clamp
        assert_eq!(lmr_base(500, 500), lmr_base(63, 63));
    }

    #[test]
    fn test_smp_tables_align() {
        assert_eq!(SMP_SKIP_DEPTHS.len(), SMP_SKIP_AMOUNT.len());
        assert!(SMP_SKIP_DEPTHS.iter().all(|&d| d > 0));
    }
}

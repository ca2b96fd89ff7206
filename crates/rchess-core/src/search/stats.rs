//! Search statistics (only with the `search-stats` feature)
//!
//! Counts how often each pruning stage fires, TT behaviour and cutoff
//! quality, for tuning and debugging.

#[cfg(feature = "search-stats")]
use crate::eval::EvalCaches;

/// Per-thread counters
#[cfg(feature = "search-stats")]
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// `negamax` calls
    pub nodes_searched: u64,
    /// `qsearch` calls
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_misses: u64,
    pub tt_cutoffs: u64,
    pub static_null_pruned: u64,
    pub razored: u64,
    pub null_move_cutoffs: u64,
    pub null_move_fails: u64,
    pub late_move_pruned: u64,
    pub futility_pruned: u64,
    pub see_pruned: u64,
    pub delta_pruned: u64,
    pub lmr_applied: u64,
    /// Reduced searches that had to be repeated at full depth
    pub lmr_research: u64,
    pub check_extensions: u64,
    pub fail_high: u64,
    /// Fail-highs on the first move searched
    pub fail_high_first: u64,
    pub mates: u64,
    pub stalemates: u64,
}

#[cfg(feature = "search-stats")]
impl SearchStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Accumulate another thread's counters
    pub fn merge(&mut self, other: &SearchStats) {
        macro_rules! add {
            ($($field:ident),*) => { $(self.$field += other.$field;)* };
        }
        add!(
            nodes_searched, qnodes, tt_hits, tt_misses, tt_cutoffs, static_null_pruned, razored,
            null_move_cutoffs, null_move_fails, late_move_pruned, futility_pruned, see_pruned,
            delta_pruned, lmr_applied, lmr_research, check_extensions, fail_high, fail_high_first,
            mates, stalemates
        );
    }

    pub fn format_report(&self, caches: &EvalCaches) -> String {
        let percent = |hits: u64, misses: u64| {
            let total = hits + misses;
            if total == 0 { 0.0 } else { hits as f64 * 100.0 / total as f64 }
        };
        let mut report = String::new();
        report.push_str("=== Search Statistics ===\n");
        report.push_str(&format!("Nodes searched:      {:>12}\n", self.nodes_searched));
        report.push_str(&format!("Q-nodes:             {:>12}\n", self.qnodes));
        report.push_str(&format!(
            "TT hits:             {:>12} ({:.1}%)\n",
            self.tt_hits,
            percent(self.tt_hits, self.tt_misses)
        ));
        report.push_str(&format!("TT cutoffs:          {:>12}\n", self.tt_cutoffs));
        report.push_str("--- Node Pruning ---\n");
        report.push_str(&format!("Static null move:    {:>12}\n", self.static_null_pruned));
        report.push_str(&format!("Razoring:            {:>12}\n", self.razored));
        report.push_str(&format!("Null move cutoffs:   {:>12}\n", self.null_move_cutoffs));
        report.push_str(&format!("Null move fails:     {:>12}\n", self.null_move_fails));
        report.push_str("--- Move Loop ---\n");
        report.push_str(&format!("Late move pruning:   {:>12}\n", self.late_move_pruned));
        report.push_str(&format!("Futility:            {:>12}\n", self.futility_pruned));
        report.push_str(&format!("SEE pruning:         {:>12}\n", self.see_pruned));
        report.push_str(&format!("Delta pruning:       {:>12}\n", self.delta_pruned));
        report.push_str(&format!("LMR applied:         {:>12}\n", self.lmr_applied));
        report.push_str(&format!("LMR re-search:       {:>12}\n", self.lmr_research));
        report.push_str(&format!("Check extensions:    {:>12}\n", self.check_extensions));
        report.push_str(&format!(
            "Fail high:           {:>12} ({:.1}% on first move)\n",
            self.fail_high,
            percent(self.fail_high_first, self.fail_high - self.fail_high_first)
        ));
        report.push_str(&format!("Mates / stalemates:  {:>12} / {}\n", self.mates, self.stalemates));
        report.push_str("--- Eval Caches ---\n");
        for (name, hits, misses) in [
            ("eval", caches.eval.hits(), caches.eval.misses()),
            ("pawns", caches.pawns.hits(), caches.pawns.misses()),
            ("material", caches.material.hits(), caches.material.misses()),
        ] {
            report.push_str(&format!("  {name:<10} {hits:>10} hits ({:.1}%)\n", percent(hits, misses)));
        }
        report
    }
}

/// Bump a counter in `self.td.stats` (no-op without the feature)
#[cfg(feature = "search-stats")]
macro_rules! inc_stat {
    ($self:expr, $field:ident) => {
        $self.td.stats.$field += 1;
    };
}

#[cfg(not(feature = "search-stats"))]
macro_rules! inc_stat {
    ($self:expr, $field:ident) => {};
}

pub(super) use inc_stat;

#[cfg(all(test, feature = "search-stats"))]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_report() {
        let mut a = SearchStats { nodes_searched: 10, fail_high: 4, fail_high_first: 3, ..Default::default() };
        let b = SearchStats { nodes_searched: 5, razored: 2, ..Default::default() };
        a.merge(&b);
        assert_eq!(a.nodes_searched, 15);
        assert_eq!(a.razored, 2);
        let report = a.format_report(&EvalCaches::new());
        assert!(report.contains("Razoring:"));
        assert!(report.contains("75.0% on first move"));
        a.reset();
        assert_eq!(a.nodes_searched, 0);
    }
}

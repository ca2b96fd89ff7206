//! Flags and counters shared by the search threads

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::debug;

/// Cross-thread search control.
///
/// `running` is polled at every node; clearing it makes every thread unwind.
/// While `pondering`, a deadline only sets `max_time_exceeded`, and the
/// search stops at the following ponder-hit.
#[derive(Debug, Default)]
pub struct SearchSignals {
    running: AtomicBool,
    pondering: AtomicBool,
    max_time_exceeded: AtomicBool,
    /// Threads still alive, including the coordinator
    active: AtomicBool,
}

impl SearchSignals {
    pub fn new(pondering: bool) -> Self {
        Self {
            running: AtomicBool::new(true),
            pondering: AtomicBool::new(pondering),
            max_time_exceeded: AtomicBool::new(false),
            active: AtomicBool::new(true),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_pondering(&self) -> bool {
        self.pondering.load(Ordering::Relaxed)
    }

    /// Ask every thread to finish
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::Relaxed) {
            debug!("search stop requested");
        }
    }

    /// Hard deadline reached
    pub fn deadline_reached(&self) {
        if self.is_pondering() {
            self.max_time_exceeded.store(true, Ordering::Relaxed);
        } else {
            self.stop();
        }
    }

    /// The opponent played the expected move; a passed deadline takes effect now
    pub fn ponder_hit(&self) {
        self.pondering.store(false, Ordering::Relaxed);
        if self.max_time_exceeded.load(Ordering::Relaxed) {
            self.stop();
        }
    }

    #[inline]
    pub fn max_time_exceeded(&self) -> bool {
        self.max_time_exceeded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn finish(&self) {
        self.running.store(false, Ordering::Relaxed);
        self.active.store(false, Ordering::Release);
    }
}

/// Per-thread node counters, summed by the main thread for reporting
#[derive(Debug)]
pub struct NodeCounters {
    counts: Box<[AtomicU64]>,
}

impl NodeCounters {
    pub fn new(threads: usize) -> Self {
        Self { counts: (0..threads.max(1)).map(|_| AtomicU64::new(0)).collect() }
    }

    #[inline]
    pub fn publish(&self, thread_id: usize, nodes: u64) {
        if let Some(counter) = self.counts.get(thread_id) {
            counter.store(nodes, Ordering::Relaxed);
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_while_pondering_defers_stop() {
        let signals = SearchSignals::new(true);
        signals.deadline_reached();
        assert!(signals.is_running());
        assert!(signals.max_time_exceeded());
        signals.ponder_hit();
        assert!(!signals.is_running());
    }

    #[test]
    fn test_ponder_hit_before_deadline_keeps_running() {
        let signals = SearchSignals::new(true);
        signals.ponder_hit();
        assert!(signals.is_running());
        assert!(!signals.is_pondering());
        signals.deadline_reached();
        assert!(!signals.is_running());
    }

    #[test]
    fn test_node_counters_sum() {
        let counters = NodeCounters::new(3);
        counters.publish(0, 10);
        counters.publish(2, 5);
        counters.publish(7, 100);
        assert_eq!(counters.total(), 15);
    }
}

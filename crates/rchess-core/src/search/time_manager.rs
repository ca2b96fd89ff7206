//! Time allocation
//!
//! Two budgets per search: the soft `window` (no new iteration starts after
//! it) and the hard `max_time` (the timer thread stops the search).

use std::time::{Duration, Instant};

use log::debug;

use super::limits::SearchLimits;
use crate::types::Color;

#[derive(Clone, Debug)]
pub struct TimeManager {
    start: Instant,
    /// Soft limit; `None` means unbounded
    window: Option<u64>,
    /// Hard limit; `None` means no timer-driven stop
    max_time: Option<u64>,
    exact_move_time: bool,
    infinite: bool,
}

impl TimeManager {
    /// Budget for `side` at game move `move_count`. `tt_hit` tells whether
    /// the root position has an exact table entry.
    pub fn new(limits: &SearchLimits, side: Color, move_count: u32, tt_hit: bool) -> Self {
        let start = Instant::now();
        let infinite = limits.infinite;

        if let Some(ms) = limits.move_time {
            return Self { start, window: None, max_time: Some(ms), exact_move_time: true, infinite };
        }

        let Some(total) = limits.time_left(side) else {
            return Self { start, window: None, max_time: None, exact_move_time: false, infinite };
        };

        let increment = limits.increment(side);
        let mut window = match limits.moves_to_go {
            Some(mtg) if mtg > 0 => total / mtg as u64 / 2,
            _ => {
                let inc_window = if increment < total / 2 { increment / 2 } else { 0 };
                if move_count <= 40 {
                    total / (80 - move_count as u64) + inc_window
                } else {
                    total / 50 + inc_window / 2
                }
            }
        };
        if !tt_hit {
            window *= 2;
        }

        let max_time = match limits.moves_to_go {
            Some(1) => total.saturating_sub(200).max(50),
            Some(mtg @ 2..=4) => total / mtg as u64,
            _ => window * 4,
        };

        debug!("time budget: window {window} ms, max {max_time} ms (total {total}, inc {increment})");
        Self {
            start,
            window: Some(window),
            max_time: Some(max_time),
            exact_move_time: false,
            infinite,
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Hard deadline for the timer thread; `None` for infinite or pondering searches
    pub fn deadline(&self) -> Option<Instant> {
        if self.infinite {
            return None;
        }
        self.max_time.map(|ms| self.start + Duration::from_millis(ms))
    }

    /// Soft budget in milliseconds
    pub fn window_ms(&self) -> Option<u64> {
        self.window
    }

    /// Whether another iteration may start
    pub fn has_time_left(&self, pondering: bool) -> bool {
        if self.exact_move_time || pondering || self.infinite {
            return true;
        }
        match self.window {
            Some(window) => self.elapsed_ms() < window,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(total: u64, inc: u64, mtg: Option<u32>) -> SearchLimits {
        SearchLimits { wtime: Some(total), winc: Some(inc), moves_to_go: mtg, ..Default::default() }
    }

    #[test]
    fn test_sudden_death_window() {
        let tm = TimeManager::new(&clock(60_000, 0, None), Color::White, 0, true);
        assert_eq!(tm.window_ms(), Some(750));
        assert_eq!(tm.max_time, Some(3000));
        // Late in the game
        let tm = TimeManager::new(&clock(60_000, 1000, None), Color::White, 60, true);
        assert_eq!(tm.window_ms(), Some(1200 + 250));
    }

    #[test]
    fn test_no_exact_tt_hit_doubles_window() {
        let tm = TimeManager::new(&clock(60_000, 1000, None), Color::White, 20, false);
        assert_eq!(tm.window_ms(), Some((1000 + 500) * 2));
    }

    #[test]
    fn test_moves_to_go() {
        let tm = TimeManager::new(&clock(60_000, 0, Some(30)), Color::White, 10, true);
        assert_eq!(tm.window_ms(), Some(1000));
        assert_eq!(tm.max_time, Some(4000));
        let tm = TimeManager::new(&clock(10_000, 0, Some(1)), Color::White, 10, true);
        assert_eq!(tm.max_time, Some(9800));
        let tm = TimeManager::new(&clock(100, 0, Some(1)), Color::White, 10, true);
        assert_eq!(tm.max_time, Some(50));
        let tm = TimeManager::new(&clock(9_000, 0, Some(3)), Color::White, 10, true);
        assert_eq!(tm.max_time, Some(3000));
    }

    #[test]
    fn test_move_time_and_infinite() {
        let tm = TimeManager::new(&SearchLimits::move_time(250), Color::Black, 0, false);
        assert!(tm.has_time_left(false));
        assert!(tm.deadline().is_some());

        let limits = SearchLimits { infinite: true, wtime: Some(1000), ..Default::default() };
        let tm = TimeManager::new(&limits, Color::White, 0, true);
        assert!(tm.deadline().is_none());
        assert!(tm.has_time_left(false));
    }

    #[test]
    fn test_uses_side_to_move_clock() {
        let limits = SearchLimits { wtime: Some(1000), btime: Some(80_000), ..Default::default() };
        let tm = TimeManager::new(&limits, Color::Black, 0, true);
        assert_eq!(tm.window_ms(), Some(1000));
    }
}

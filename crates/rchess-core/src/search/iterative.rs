//! Iterative deepening with aspiration windows
//!
//! The main thread owns time control and reporting. Helpers run the same
//! loop on a skip schedule so threads spread over different depths and
//! share their work through the transposition table.

use log::debug;

use crate::engine::{SearchInfo, SearchListener};
use crate::position::Position;
use crate::types::{Bound, Depth, Value};

use super::alpha_beta::SearchWorker;
use super::constants::{
    ASPIRATION_MAX_SCORE, ASPIRATION_MIN_DEPTH, ASPIRATION_WINDOW_DELTA, SMP_SKIP_AMOUNT, SMP_SKIP_DEPTHS,
};
use super::pv::{PvLine, extract_pv};
use super::time_manager::TimeManager;

/// Initial aspiration half-width for `depth`, or `None` for a full window
fn aspiration_delta(enabled: bool, depth: Depth, score: Value) -> Option<i32> {
    (enabled && depth >= ASPIRATION_MIN_DEPTH && score.raw().abs() < ASPIRATION_MAX_SCORE)
        .then_some(ASPIRATION_WINDOW_DELTA)
}

fn window(score: Value, delta: Option<i32>) -> (Value, Value) {
    match delta {
        Some(d) => ((score - d).max(-Value::INFINITE), (score + d).min(Value::INFINITE)),
        None => (-Value::INFINITE, Value::INFINITE),
    }
}

/// Depth a helper searches after `depth`, or `None` past `max_depth`
pub(crate) fn helper_next_depth(id: usize, depth: Depth, max_depth: Depth) -> Option<Depth> {
    let cycle = (id.saturating_sub(1)) % SMP_SKIP_DEPTHS.len();
    let mut next = depth + 1;
    if (next + cycle as Depth) % SMP_SKIP_DEPTHS[cycle] == 0 {
        next += SMP_SKIP_AMOUNT[cycle];
    }
    (next <= max_depth).then_some(next)
}

impl SearchWorker<'_> {
    /// Main thread: deepen until the depth limit, the soft time budget or a stop
    pub fn run_main(&mut self, pos: &mut Position, max_depth: Depth, time: &TimeManager, listener: &dyn SearchListener) {
        self.td.clear_history();
        self.init_pv(pos);

        let aspiration = self.ctx.toggles.aspiration_windows;
        let mut score = Value::ZERO;
        let mut fail_low = false;
        let mut depth: Depth = 0;

        while self.is_running() && depth < max_depth {
            depth += 1;
            let mut delta = aspiration_delta(aspiration, depth, score);
            let (mut alpha, mut beta) = window(score, delta);

            loop {
                if !time.has_time_left(self.ctx.signals.is_pondering()) && depth != 1 && !fail_low {
                    debug!("soft time limit reached before depth {depth}");
                    return;
                }

                let result = self.negamax(pos, 0, depth, alpha, beta, 0);
                if !self.is_running() {
                    return;
                }
                score = result;
                self.publish_nodes();
                listener.on_info(&self.search_info(depth, time));

                fail_low = false;
                match delta {
                    Some(d) if score <= alpha => {
                        fail_low = true;
                        alpha = (alpha - d).max(-Value::INFINITE);
                        delta = Some(d * 2);
                    }
                    Some(d) if score >= beta => {
                        beta = (beta + d).min(Value::INFINITE);
                        delta = Some(d * 2);
                    }
                    _ => break,
                }
            }

            self.completed_depth = depth;
            debug!(
                "depth {depth} done: score {} nodes {} pv {}",
                self.td.best_score,
                self.ctx.nodes.total(),
                super::pv::pv_to_string(&self.td.pv)
            );
        }
    }

    /// Helper thread: same loop without time control or reporting
    pub fn run_helper(&mut self, pos: &mut Position, max_depth: Depth) {
        self.td.clear_history();

        let aspiration = self.ctx.toggles.aspiration_windows;
        let mut score = Value::ZERO;
        let mut depth: Depth = 0;

        while self.is_running() {
            let Some(next) = helper_next_depth(self.td.id(), depth, max_depth) else {
                break;
            };
            depth = next;
            let mut delta = aspiration_delta(aspiration, depth, score);
            let (mut alpha, mut beta) = window(score, delta);

            loop {
                let result = self.negamax(pos, 0, depth, alpha, beta, 0);
                if !self.is_running() {
                    self.publish_nodes();
                    return;
                }
                score = result;
                match delta {
                    Some(d) if score <= alpha => {
                        alpha = (alpha - d).max(-Value::INFINITE);
                        delta = Some(d * 2);
                    }
                    Some(d) if score >= beta => {
                        beta = (beta + d).min(Value::INFINITE);
                        delta = Some(d * 2);
                    }
                    _ => break,
                }
            }
            self.completed_depth = depth;
            self.publish_nodes();
        }
        self.publish_nodes();
    }

    /// Seed the root PV from the table so a stop before depth 1 completes
    /// still has a move
    fn init_pv(&mut self, pos: &mut Position) {
        self.td.pv = PvLine::new();
        if let Some(entry) = self.ctx.tt.probe(pos.key()) {
            let mv = entry.mv();
            if mv.is_some() && pos.is_valid_move(mv) && pos.is_legal(mv) {
                self.td.pv = extract_pv(pos, self.ctx.tt, mv);
                self.td.best_score = entry.score(0);
                self.td.best_bound = entry.bound();
            }
        }
    }

    fn search_info(&self, depth: Depth, time: &TimeManager) -> SearchInfo {
        let elapsed = time.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        let nodes = self.ctx.nodes.total();
        let secs = elapsed.as_secs_f64();
        let nps = if secs > 0.0 { (nodes as f64 / secs) as u64 } else { 0 };
        SearchInfo {
            depth,
            seldepth: self.td.seldepth,
            score: self.td.best_score,
            bound: if self.td.best_bound == Bound::None { Bound::Exact } else { self.td.best_bound },
            nodes,
            nps,
            hashfull: self.ctx.tt.hashfull(),
            elapsed_ms,
            pv: self.td.pv.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_skip_schedule() {
        // Helper 1: cycle 0 skips every depth by 1
        assert_eq!(helper_next_depth(1, 0, 64), Some(2));
        assert_eq!(helper_next_depth(1, 2, 64), Some(4));
        // Helper 3: cycle 2, skip 1 when (depth + 2) is even
        assert_eq!(helper_next_depth(3, 0, 64), Some(1));
        assert_eq!(helper_next_depth(3, 1, 64), Some(3));
        // Helper 17 wraps to cycle 0
        assert_eq!(helper_next_depth(17, 0, 64), helper_next_depth(1, 0, 64));
        assert_eq!(helper_next_depth(1, 63, 64), None);
    }

    #[test]
    fn test_aspiration_window() {
        assert_eq!(aspiration_delta(true, 5, Value::ZERO), None);
        assert_eq!(aspiration_delta(true, 6, Value::new(50)), Some(20));
        assert_eq!(aspiration_delta(true, 6, Value::new(1000)), None);
        assert_eq!(aspiration_delta(false, 10, Value::ZERO), None);
        assert_eq!(window(Value::new(50), Some(20)), (Value::new(30), Value::new(70)));
        assert_eq!(window(Value::ZERO, None), (-Value::INFINITE, Value::INFINITE));
    }
}

//! Principal variation search
//!
//! `negamax` order of work: stop poll, mate-distance pruning, quiescence at
//! the horizon, TT cutoff, node-level pruning, then the staged move loop with
//! move-level pruning, LMR and PVS re-searches.

use crate::eval::Evaluator;
use crate::position::Position;
use crate::see::see_capture;
use crate::tt::TranspositionTable;
use crate::types::{Bound, Depth, MAX_PLY, Move, Value};

use super::constants::{NODE_CHECK_INTERVAL, PRUNING_ORDER_SCORE_LIMIT};
use super::movepicker::{MovePicker, Phase};
use super::pruning::{self, LmrInput, PruneToggles};
use super::pv::extract_pv;
use super::signals::{NodeCounters, SearchSignals};
use super::stats::inc_stat;
use super::thread_data::ThreadData;

/// Read-only state shared by every thread of one search
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub tt: &'a TranspositionTable,
    pub evaluator: &'a dyn Evaluator,
    pub signals: &'a SearchSignals,
    pub nodes: &'a NodeCounters,
    pub toggles: PruneToggles,
    pub under_promotions: bool,
    pub node_limit: Option<u64>,
}

/// One search thread: shared context plus its own `ThreadData`
pub struct SearchWorker<'a> {
    pub(crate) ctx: SearchContext<'a>,
    pub(crate) td: ThreadData,
    /// Last depth the root search finished without interruption
    pub(crate) completed_depth: Depth,
}

impl<'a> SearchWorker<'a> {
    pub fn new(ctx: SearchContext<'a>, td: ThreadData) -> Self {
        Self { ctx, td, completed_depth: 0 }
    }

    #[inline]
    pub fn thread_data(&self) -> &ThreadData {
        &self.td
    }

    #[inline]
    pub(super) fn is_running(&self) -> bool {
        self.ctx.signals.is_running()
    }

    /// Count a node; every `NODE_CHECK_INTERVAL` nodes publish the count and
    /// let the main thread enforce the node limit
    #[inline]
    pub(super) fn count_node(&mut self, ply: usize) {
        self.td.nodes += 1;
        self.td.seldepth = self.td.seldepth.max(ply as i32);
        if self.td.nodes % NODE_CHECK_INTERVAL == 0 {
            self.publish_nodes();
            let limit_reached = self.ctx.node_limit.is_some_and(|limit| self.ctx.nodes.total() >= limit);
            if self.td.is_main() && limit_reached {
                self.ctx.signals.stop();
            }
        }
    }

    #[inline]
    pub(crate) fn publish_nodes(&self) {
        self.ctx.nodes.publish(self.td.id(), self.td.nodes);
    }

    /// Static eval from the side to move, kept out of the mate range
    ///
    /// The thread's eval cache is consulted first; on a miss the evaluator
    /// gets the pawn and material caches as well.
    #[inline]
    pub(super) fn evaluate(&mut self, pos: &Position) -> Value {
        let key = pos.key();
        let raw = match self.td.eval_caches.eval.get(key) {
            Some(score) => score,
            None => {
                let score = self.ctx.evaluator.evaluate_with(pos, &mut self.td.eval_caches);
                self.td.eval_caches.eval.insert(key, score);
                score
            }
        };
        let bound = Value::MATE_BOUND.raw() - 1;
        Value::new(raw.clamp(-bound, bound))
    }

    pub fn negamax(
        &mut self,
        pos: &mut Position,
        ply: usize,
        mut depth: Depth,
        mut alpha: Value,
        mut beta: Value,
        null_move_count: u32,
    ) -> Value {
        if !self.is_running() {
            return Value::ZERO;
        }
        self.count_node(ply);
        inc_stat!(self, nodes_searched);

        if ply >= MAX_PLY {
            return self.evaluate(pos);
        }

        let toggles = self.ctx.toggles;
        let in_check = pos.in_check();
        if in_check && toggles.check_extension {
            depth += 1;
            inc_stat!(self, check_extensions);
        }

        let alpha_orig = alpha;
        let pv_node = beta.raw() - alpha.raw() != 1;

        if toggles.mate_distance_pruning {
            alpha = alpha.max(Value::mated_in(ply as i32));
            beta = beta.min(Value::mate_in(ply as i32 + 1));
            if alpha >= beta {
                return alpha;
            }
        }

        if depth <= 0 {
            return self.qsearch(pos, ply, alpha, beta);
        }

        let key = pos.key();

        // Transposition table
        let tt_entry = self.ctx.tt.probe(key);
        let tt_score = tt_entry.map_or(Value::NONE, |e| e.score(ply as i32));
        if tt_entry.is_some() {
            inc_stat!(self, tt_hits);
        } else {
            inc_stat!(self, tt_misses);
        }
        if let Some(entry) = tt_entry.filter(|e| !pv_node && e.depth() >= depth) {
            let cutoff = match entry.bound() {
                Bound::Exact => true,
                Bound::Lower => tt_score >= beta,
                Bound::Upper => tt_score <= alpha,
                Bound::None => false,
            };
            if cutoff {
                inc_stat!(self, tt_cutoffs);
                return tt_score;
            }
        }

        // Node-level pruning
        let mut eval = Value::NONE;
        if !pv_node && !in_check {
            eval = self.evaluate(pos);
            if tt_entry.is_some_and(|e| e.can_refine_eval(eval.raw(), tt_score.raw())) {
                eval = tt_score;
            }

            if let Some(score) = pruning::static_null_move(&toggles, depth, eval, beta) {
                inc_stat!(self, static_null_pruned);
                return score;
            }

            if let Some(margin) = pruning::razoring_margin(&toggles, depth, eval, alpha) {
                let window = alpha - margin;
                let score = self.qsearch(pos, ply, window, window + 1);
                if score + margin <= alpha {
                    inc_stat!(self, razored);
                    return score;
                }
            }

            let non_pawn = pos.has_non_pawn_material(pos.side_to_move());
            if let Some(r) =
                pruning::null_move_reduction(&toggles, null_move_count, depth, eval, beta, non_pawn)
            {
                pos.do_null_move();
                self.td.set_played(ply, Move::NONE);
                let score = if depth - r <= 0 {
                    -self.qsearch(pos, ply + 1, -beta, -beta + 1)
                } else {
                    -self.negamax(pos, ply + 1, depth - r, -beta, -beta + 1, null_move_count + 1)
                };
                pos.undo_null_move();
                if score >= beta {
                    inc_stat!(self, null_move_cutoffs);
                    return score;
                }
                inc_stat!(self, null_move_fails);
            }
        }

        // Move loop
        let us = pos.side_to_move();
        let parent = self.td.parent_move(ply);
        let tt_move = tt_entry.map_or(Move::NONE, |e| e.mv());
        let mut picker = MovePicker::new(tt_move, ply, parent, self.ctx.under_promotions);

        let mut best_score = -Value::INFINITE;
        let mut best_move = Move::NONE;
        let mut moves_played = 0usize;

        self.td.start_ply();
        'phases: while let Some(phase) = picker.fill_next(pos, &mut self.td) {
            while self.td.has_next() {
                if !self.is_running() {
                    self.td.end_ply();
                    return Value::ZERO;
                }
                let (mv, order_score) = self.td.next();
                if picker.is_duplicate(phase, mv) || !pos.is_legal(mv) {
                    continue;
                }

                if !pv_node
                    && !in_check
                    && moves_played > 0
                    && order_score < PRUNING_ORDER_SCORE_LIMIT
                    && !pos.discovered().contains(mv.from())
                {
                    match phase {
                        Phase::Quiets => {
                            if pruning::late_move_prune(&toggles, depth, moves_played) {
                                inc_stat!(self, late_move_pruned);
                                continue;
                            }
                            if pruning::futility_prune(&toggles, depth, eval, alpha, mv) {
                                inc_stat!(self, futility_pruned);
                                continue;
                            }
                        }
                        Phase::Attacks => {
                            if pruning::see_prune(&toggles, depth, || see_capture(pos, mv)) {
                                inc_stat!(self, see_pruned);
                                continue;
                            }
                        }
                        _ => {}
                    }
                }

                pos.do_move(mv);
                self.td.set_played(ply, mv);
                moves_played += 1;

                let score = if pos.is_repetition(mv) || pos.is_draw_by_material() {
                    Value::DRAW
                } else {
                    self.ctx.tt.prefetch(pos.key());
                    self.search_child(pos, ply, depth, alpha, beta, mv, order_score, moves_played, in_check, pv_node, &picker)
                };

                pos.undo_move(mv);

                if score > best_score {
                    best_score = score;
                    best_move = mv;

                    if ply == 0 && self.td.is_main() && self.is_running() {
                        self.record_root_move(pos, mv, alpha_orig, beta, score, depth);
                    }

                    alpha = alpha.max(score);
                    if alpha >= beta {
                        inc_stat!(self, fail_high);
                        if moves_played == 1 {
                            inc_stat!(self, fail_high_first);
                        }
                        if mv.is_quiet() && !in_check {
                            self.td.add_counter_move(us, parent, mv);
                            self.td.add_killer(mv, ply);
                            self.td.add_history(us, mv, depth);
                        }
                        break 'phases;
                    }
                }

                if mv.is_quiet() {
                    self.td.add_butterfly(us, mv, depth);
                }
            }
        }
        self.td.end_ply();

        if moves_played == 0 {
            return if in_check {
                inc_stat!(self, mates);
                Value::mated_in(ply as i32)
            } else {
                inc_stat!(self, stalemates);
                Value::DRAW
            };
        }

        if self.is_running() {
            let bound = if best_score >= beta {
                Bound::Lower
            } else if best_score <= alpha_orig {
                Bound::Upper
            } else {
                Bound::Exact
            };
            self.ctx.tt.store(key, best_score, ply as i32, depth, bound, best_move);
        }
        best_score
    }

    /// LMR, null-window and full-window searches of one child
    #[allow(clippy::too_many_arguments)]
    fn search_child(
        &mut self,
        pos: &mut Position,
        ply: usize,
        depth: Depth,
        alpha: Value,
        beta: Value,
        mv: Move,
        order_score: i32,
        moves_played: usize,
        in_check: bool,
        pv_node: bool,
        picker: &MovePicker,
    ) -> Value {
        if moves_played == 1 {
            return -self.negamax(pos, ply + 1, depth - 1, -beta, -alpha, 0);
        }

        let mut reduction = 1;
        if self.ctx.toggles.late_move_reduction
            && depth >= 3
            && mv.is_quiet()
            && !mv.is_pawn_push_78()
            && !in_check
            && !pos.in_check()
        {
            reduction = pruning::late_move_reduction(LmrInput {
                depth,
                moves_played,
                order_score,
                killer_or_counter: picker.is_refutation(mv),
                pv_node,
            });
        }

        let mut score = alpha + 1;
        if reduction > 1 {
            inc_stat!(self, lmr_applied);
            score = -self.negamax(pos, ply + 1, depth - reduction, -alpha - 1, -alpha, 0);
            if score > alpha {
                inc_stat!(self, lmr_research);
            }
        }
        if score > alpha {
            score = -self.negamax(pos, ply + 1, depth - 1, -alpha - 1, -alpha, 0);
        }
        if score > alpha && score < beta {
            score = -self.negamax(pos, ply + 1, depth - 1, -beta, -alpha, 0);
        }
        score
    }

    /// Main thread: new best root move
    fn record_root_move(&mut self, pos: &mut Position, mv: Move, alpha: Value, beta: Value, score: Value, depth: Depth) {
        self.td.best_score = score;
        self.td.best_depth = depth;
        self.td.best_bound = if score <= alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.td.pv = extract_pv(pos, self.ctx.tt, mv);
    }
}

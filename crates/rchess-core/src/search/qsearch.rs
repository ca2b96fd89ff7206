//! Quiescence search: captures and queen promotions until the position is quiet

use crate::movegen::generate_attacks_into;
use crate::position::Position;
use crate::see::see_capture;
use crate::types::{Bound, PieceType, Value};

use super::alpha_beta::SearchWorker;
use super::pruning;
use super::stats::inc_stat;
use super::thread_data::MAX_FRAMES;

impl SearchWorker<'_> {
    pub fn qsearch(&mut self, pos: &mut Position, ply: usize, mut alpha: Value, beta: Value) -> Value {
        if !self.is_running() {
            return Value::ZERO;
        }
        self.count_node(ply);
        inc_stat!(self, qnodes);

        if ply >= MAX_FRAMES - 1 {
            return self.evaluate(pos);
        }

        let tt_entry = self.ctx.tt.probe(pos.key());
        let tt_score = tt_entry.map_or(Value::NONE, |e| e.score(ply as i32));
        if let Some(entry) = tt_entry.filter(|e| e.depth() >= 0) {
            match entry.bound() {
                Bound::Exact => return tt_score,
                Bound::Lower if tt_score >= beta => return tt_score,
                Bound::Upper if tt_score <= alpha => return tt_score,
                _ => {}
            }
        }

        // No evasion search here; negamax extends checks
        if pos.in_check() {
            return alpha;
        }

        let mut eval = self.evaluate(pos);
        if tt_entry.is_some_and(|e| e.can_refine_eval(eval.raw(), tt_score.raw())) {
            eval = tt_score;
        }
        if eval >= beta {
            return eval;
        }
        alpha = alpha.max(eval);

        let toggles = self.ctx.toggles;
        self.td.start_ply();
        generate_attacks_into(pos, false, &mut self.td);
        self.td.set_mvvlva_scores();
        self.td.sort();

        while self.td.has_next() {
            if !self.is_running() {
                self.td.end_ply();
                return Value::ZERO;
            }
            let (mv, _) = self.td.next();
            if mv.promotion_type().is_some_and(|pt| pt != PieceType::Queen) {
                continue;
            }
            if pruning::delta_prune(&toggles, eval, mv, alpha) {
                inc_stat!(self, delta_pruned);
                continue;
            }
            if !pos.discovered().contains(mv.from()) && see_capture(pos, mv) <= 0 {
                continue;
            }
            if !pos.is_legal(mv) {
                continue;
            }

            pos.do_move(mv);
            let score = if pos.is_draw_by_material() {
                Value::DRAW
            } else {
                -self.qsearch(pos, ply + 1, -beta, -alpha)
            };
            pos.undo_move(mv);

            if score >= beta {
                self.td.end_ply();
                return score;
            }
            alpha = alpha.max(score);
        }
        self.td.end_ply();
        alpha
    }
}

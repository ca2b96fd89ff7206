//! Search coordinator
//!
//! Runs on the engine's search thread: spawns the timer and the helpers as
//! scoped threads, runs the main thread's iterative deepening itself, then
//! stops and joins everything and reports the best move.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::config::EngineOptions;
use crate::engine::{SearchListener, SearchOutcome};
use crate::eval::Evaluator;
use crate::movegen::{MoveList, generate_legal};
use crate::position::Position;
use crate::search::{NodeCounters, SearchContext, SearchLimits, SearchSignals, SearchWorker, ThreadData, TimeManager};
use crate::tt::TranspositionTable;
use crate::types::{Bound, Depth, MAX_PLY, Move};

/// Timer poll interval
const TIMER_TICK: Duration = Duration::from_millis(5);

/// Everything one search needs, moved onto the search thread
pub(crate) struct SearchJob {
    pub pos: Position,
    pub limits: SearchLimits,
    pub options: EngineOptions,
    pub tt: Arc<TranspositionTable>,
    pub evaluator: Arc<dyn Evaluator>,
    pub signals: Arc<SearchSignals>,
    pub listener: Arc<dyn SearchListener>,
}

/// Sleep until `deadline`, waking every tick to notice an early stop
fn run_timer(signals: &SearchSignals, deadline: Instant) {
    while signals.is_running() {
        let now = Instant::now();
        if now >= deadline {
            debug!("hard time limit reached");
            signals.deadline_reached();
            return;
        }
        thread::sleep(TIMER_TICK.min(deadline - now));
    }
}

pub(crate) fn run(job: SearchJob) -> SearchOutcome {
    let SearchJob { pos, limits, options, tt, evaluator, signals, listener } = job;

    let threads = options.threads.max(1);
    tt.new_search(pos.move_counter());
    let tt_hit = tt.probe(pos.key()).is_some_and(|e| e.bound() == Bound::Exact);
    let time = TimeManager::new(&limits, pos.side_to_move(), pos.move_counter(), tt_hit);
    let max_depth = limits.depth.unwrap_or(MAX_PLY as Depth).clamp(1, MAX_PLY as Depth);
    let nodes = NodeCounters::new(threads);

    info!(
        "search start: {threads} thread(s), hash {} MB, max depth {max_depth}, fen {}",
        tt.size_mb(),
        pos.to_fen()
    );

    let ctx = SearchContext {
        tt: &tt,
        evaluator: evaluator.as_ref(),
        signals: &signals,
        nodes: &nodes,
        toggles: options.pruning,
        under_promotions: options.under_promotions,
        node_limit: limits.nodes,
    };

    let mut outcome = thread::scope(|scope| {
        let timer = time.deadline().and_then(|deadline| {
            let signals = &*signals;
            thread::Builder::new()
                .name("rchess-timer".into())
                .spawn_scoped(scope, move || run_timer(signals, deadline))
                .map_err(|e| warn!("failed to spawn timer thread: {e}"))
                .ok()
        });

        let mut helpers = Vec::with_capacity(threads - 1);
        for id in 1..threads {
            let mut helper_pos = pos.clone();
            let spawned = thread::Builder::new().name(format!("rchess-helper-{id}")).spawn_scoped(scope, move || {
                let mut worker = SearchWorker::new(ctx, ThreadData::new(id));
                worker.run_helper(&mut helper_pos, max_depth);
            });
            match spawned {
                Ok(handle) => helpers.push((id, handle)),
                Err(e) => warn!("failed to spawn search helper {id}: {e}"),
            }
        }

        let mut main_pos = pos.clone();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut worker = SearchWorker::new(ctx, ThreadData::new(0));
            worker.run_main(&mut main_pos, max_depth, &time, listener.as_ref());
            worker.publish_nodes();
            let td = worker.thread_data();
            let report = td.stats_report();
            if !report.is_empty() {
                debug!("main thread\n{report}");
            }
            SearchOutcome {
                best_move: td.best_move(),
                ponder_move: Some(td.ponder_move()).filter(|m| m.is_some()),
                score: td.best_score,
                depth: worker.completed_depth,
                nodes: 0,
            }
        }));

        signals.stop();
        for (id, handle) in helpers {
            if handle.join().is_err() {
                error!("search helper {id} panicked");
            }
        }
        if timer.is_some_and(|t| t.join().is_err()) {
            error!("timer thread panicked");
        }

        result.unwrap_or_else(|_| {
            error!("main search thread panicked");
            SearchOutcome::default()
        })
    });

    outcome.nodes = nodes.total();
    if outcome.best_move.is_none() {
        let mv = first_legal_move(&pos);
        if mv.is_some() {
            warn!("no best move from the search, playing the first legal move");
            outcome.best_move = mv;
            outcome.ponder_move = None;
        }
    }
    if !options.ponder {
        outcome.ponder_move = None;
    }

    info!(
        "search done: best {} depth {} score {} nodes {} in {} ms",
        if outcome.best_move.is_some() { outcome.best_move.to_string() } else { "(none)".into() },
        outcome.depth,
        outcome.score,
        outcome.nodes,
        time.elapsed_ms()
    );

    listener.on_best_move(outcome.best_move, outcome.ponder_move);
    signals.finish();
    outcome
}

fn first_legal_move(pos: &Position) -> Move {
    let mut legal = MoveList::new();
    generate_legal(pos, &mut legal);
    legal.iter().next().copied().unwrap_or(Move::NONE)
}

//! Engine façade
//!
//! `Engine` owns the options, the transposition table and the evaluator.
//! `start_search` runs the search on its own thread and returns a
//! `SearchHandle` for stop / ponder-hit / wait; progress goes to a
//! `SearchListener`.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{error, info};

use crate::config::{self, EngineOptions};
use crate::error::EngineError;
use crate::eval::{Evaluator, MaterialPsqtEvaluator};
use crate::parallel::{self, SearchJob};
use crate::position::Position;
use crate::search::{SearchLimits, SearchSignals, pv_to_string};
use crate::tt::TranspositionTable;
use crate::types::{Bound, Depth, Move, Value};

/// Progress after a completed iteration (or aspiration re-search)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: Depth,
    pub seldepth: i32,
    pub score: Value,
    pub bound: Bound,
    /// Nodes of all threads
    pub nodes: u64,
    pub nps: u64,
    /// Permille of the sampled table slots in use
    pub hashfull: u32,
    pub elapsed_ms: u64,
    pub pv: Vec<Move>,
}

impl fmt::Display for SearchInfo {
    /// UCI `info` line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "info depth {} seldepth {} score {}", self.depth, self.seldepth, self.score)?;
        match self.bound {
            Bound::Lower => write!(f, " lowerbound")?,
            Bound::Upper => write!(f, " upperbound")?,
            _ => {}
        }
        write!(
            f,
            " nodes {} nps {} hashfull {} time {}",
            self.nodes, self.nps, self.hashfull, self.elapsed_ms
        )?;
        if !self.pv.is_empty() {
            write!(f, " pv {}", pv_to_string(&self.pv))?;
        }
        Ok(())
    }
}

/// Final result of a search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `Move::NONE` only when the root has no legal move
    pub best_move: Move,
    pub ponder_move: Option<Move>,
    pub score: Value,
    /// Deepest iteration the main thread completed
    pub depth: Depth,
    pub nodes: u64,
}

impl Default for SearchOutcome {
    fn default() -> Self {
        Self { best_move: Move::NONE, ponder_move: None, score: Value::ZERO, depth: 0, nodes: 0 }
    }
}

/// Receives search progress; called from the search threads
pub trait SearchListener: Send + Sync {
    fn on_info(&self, _info: &SearchInfo) {}
    fn on_best_move(&self, _best: Move, _ponder: Option<Move>) {}
}

/// Listener that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullListener;

impl SearchListener for NullListener {}

/// A running search
#[must_use = "dropping a SearchHandle stops the search"]
pub struct SearchHandle {
    signals: Arc<SearchSignals>,
    thread: Option<JoinHandle<SearchOutcome>>,
}

impl SearchHandle {
    pub fn stop(&self) {
        self.signals.stop();
    }

    /// The expected move was played; pondering turns into a normal search
    pub fn ponder_hit(&self) {
        self.signals.ponder_hit();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Block until the search ends on its own (or after `stop`)
    pub fn wait(mut self) -> SearchOutcome {
        self.join()
    }

    fn join(&mut self) -> SearchOutcome {
        match self.thread.take().map(JoinHandle::join) {
            Some(Ok(outcome)) => outcome,
            Some(Err(_)) => {
                error!("search thread panicked");
                self.signals.finish();
                SearchOutcome::default()
            }
            None => SearchOutcome::default(),
        }
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.signals.stop();
            self.join();
        }
    }
}

pub struct Engine {
    options: EngineOptions,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator>,
    current: Option<Arc<SearchSignals>>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        options.validate()?;
        let tt = TranspositionTable::new(options.hash_mb)?;
        Ok(Self { options, tt: Arc::new(tt), evaluator: Arc::new(MaterialPsqtEvaluator), current: None })
    }

    /// Replace the built-in evaluator
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn is_searching(&self) -> bool {
        self.current.as_ref().is_some_and(|s| s.is_active())
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.is_searching() { Err(EngineError::SearchInProgress) } else { Ok(()) }
    }

    /// Resize the table; a rejected size leaves the current table untouched
    pub fn set_hash_mb(&mut self, mb: usize) -> Result<(), EngineError> {
        self.ensure_idle()?;
        TranspositionTable::validate_size(mb)?;
        match Arc::get_mut(&mut self.tt) {
            Some(tt) => {
                tt.resize(mb)?;
            }
            None => self.tt = Arc::new(TranspositionTable::new(mb)?),
        }
        self.options.hash_mb = mb;
        info!("hash set to {mb} MB");
        Ok(())
    }

    pub fn set_threads(&mut self, threads: usize) -> Result<(), EngineError> {
        self.ensure_idle()?;
        config::validate_threads(threads)?;
        self.options.threads = threads;
        info!("threads set to {threads}");
        Ok(())
    }

    pub fn set_ponder(&mut self, ponder: bool) {
        self.options.ponder = ponder;
    }

    /// Apply a whole option set, validated before anything changes
    pub fn set_options(&mut self, options: EngineOptions) -> Result<(), EngineError> {
        self.ensure_idle()?;
        options.validate()?;
        if options.hash_mb != self.options.hash_mb {
            self.set_hash_mb(options.hash_mb)?;
        }
        self.options = options;
        Ok(())
    }

    /// Forget everything learned in earlier searches (new game)
    pub fn clear_hash(&self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.tt.clear();
        Ok(())
    }

    pub fn hashfull(&self) -> u32 {
        self.tt.hashfull()
    }

    pub fn start_search(
        &mut self,
        pos: &Position,
        limits: SearchLimits,
        listener: Arc<dyn SearchListener>,
    ) -> Result<SearchHandle, EngineError> {
        self.ensure_idle()?;
        let signals = Arc::new(SearchSignals::new(limits.ponder));
        let job = SearchJob {
            pos: pos.clone(),
            limits,
            options: self.options,
            tt: Arc::clone(&self.tt),
            evaluator: Arc::clone(&self.evaluator),
            signals: Arc::clone(&signals),
            listener,
        };
        let thread = thread::Builder::new().name("rchess-search".into()).spawn(move || parallel::run(job))?;
        self.current = Some(Arc::clone(&signals));
        Ok(SearchHandle { signals, thread: Some(thread) })
    }

    /// Search and wait for the result
    pub fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchOutcome, EngineError> {
        Ok(self.start_search(pos, limits, Arc::new(NullListener))?.wait())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        infos: Mutex<Vec<SearchInfo>>,
        best: Mutex<Option<(Move, Option<Move>)>>,
    }

    impl SearchListener for Recorder {
        fn on_info(&self, info: &SearchInfo) {
            self.infos.lock().unwrap().push(info.clone());
        }

        fn on_best_move(&self, best: Move, ponder: Option<Move>) {
            *self.best.lock().unwrap() = Some((best, ponder));
        }
    }

    fn engine() -> Engine {
        Engine::new(EngineOptions { hash_mb: 1, ..Default::default() }).unwrap()
    }

    #[test]
    fn test_fixed_depth_reports_each_depth() {
        let mut engine = engine();
        let recorder = Arc::new(Recorder::default());
        let handle = engine.start_search(&Position::startpos(), SearchLimits::depth(4), recorder.clone()).unwrap();
        let outcome = handle.wait();
        assert!(outcome.best_move.is_some());
        assert_eq!(outcome.depth, 4);
        assert!(outcome.nodes > 0);

        let infos = recorder.infos.lock().unwrap();
        let depths: Vec<Depth> = infos.iter().map(|i| i.depth).collect();
        assert_eq!(depths.first(), Some(&1));
        assert_eq!(depths.last(), Some(&4));
        assert!(infos.iter().all(|i| !i.pv.is_empty()));
        assert_eq!(*recorder.best.lock().unwrap(), Some((outcome.best_move, None)));
        assert!(!engine.is_searching());
    }

    #[test]
    fn test_stop_infinite_search() {
        let mut engine = engine();
        let limits = SearchLimits { infinite: true, ..Default::default() };
        let handle = engine.start_search(&Position::startpos(), limits, Arc::new(NullListener)).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(engine.is_searching());
        assert!(matches!(engine.set_threads(2), Err(EngineError::SearchInProgress)));
        handle.stop();
        let outcome = handle.wait();
        assert!(outcome.best_move.is_some());
        assert!(!engine.is_searching());
    }

    #[test]
    fn test_rejected_options_leave_state() {
        let mut engine = engine();
        assert!(engine.set_hash_mb(3).is_err());
        assert_eq!(engine.options().hash_mb, 1);
        assert!(engine.set_threads(65).is_err());
        assert_eq!(engine.options().threads, 1);
        engine.set_hash_mb(2).unwrap();
        engine.set_threads(3).unwrap();
        assert_eq!(engine.options().hash_mb, 2);
        assert_eq!(engine.options().threads, 3);
    }

    #[test]
    fn test_no_legal_moves() {
        let mut engine = engine();
        let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let outcome = engine.search(&mated, SearchLimits::depth(3)).unwrap();
        assert!(outcome.best_move.is_none());
    }

    #[test]
    fn test_ponder_move_only_when_enabled() {
        let mut engine = Engine::new(EngineOptions { hash_mb: 1, ponder: true, ..Default::default() }).unwrap();
        let outcome = engine.search(&Position::startpos(), SearchLimits::depth(5)).unwrap();
        assert!(outcome.ponder_move.is_some());
    }

    #[test]
    fn test_info_line_format() {
        let pos = Position::startpos();
        let info = SearchInfo {
            depth: 3,
            seldepth: 5,
            score: Value::new(25),
            bound: Bound::Lower,
            nodes: 1000,
            nps: 50_000,
            hashfull: 1,
            elapsed_ms: 20,
            pv: vec![pos.parse_move("e2e4").unwrap()],
        };
        assert_eq!(
            info.to_string(),
            "info depth 3 seldepth 5 score cp 25 lowerbound nodes 1000 nps 50000 hashfull 1 time 20 pv e2e4"
        );
    }
}

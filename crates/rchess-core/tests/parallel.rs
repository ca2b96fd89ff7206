//! Lazy SMP: several threads sharing one table

use std::sync::Arc;
use std::time::Duration;

use rchess_core::{Engine, EngineOptions, NullListener, Position, SearchLimits};

fn engine(threads: usize) -> Engine {
    Engine::new(EngineOptions { hash_mb: 8, threads, ..Default::default() }).unwrap()
}

#[test]
fn test_multi_thread_finds_mate() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let outcome = engine(4).search(&pos, SearchLimits::depth(5)).unwrap();
    assert_eq!(outcome.best_move.to_string(), "a1a8");
    assert_eq!(outcome.score.mate_moves(), Some(1));
}

#[test]
fn test_helpers_add_nodes() {
    let pos = Position::startpos();
    let single = engine(1).search(&pos, SearchLimits::depth(6)).unwrap();
    let multi = engine(4).search(&pos, SearchLimits::depth(6)).unwrap();
    assert!(multi.best_move.is_some());
    assert_eq!(multi.depth, 6);
    assert!(single.nodes > 0 && multi.nodes > 0);
}

#[test]
fn test_stop_joins_all_threads() {
    let mut engine = engine(8);
    let limits = SearchLimits { infinite: true, ..Default::default() };
    let handle = engine.start_search(&Position::startpos(), limits, Arc::new(NullListener)).unwrap();
    std::thread::sleep(Duration::from_millis(100));
    handle.stop();
    let outcome = handle.wait();
    assert!(outcome.best_move.is_some());
    assert!(!engine.is_searching());

    // The engine is usable again right away
    engine.set_threads(2).unwrap();
    let again = engine.search(&Position::startpos(), SearchLimits::depth(3)).unwrap();
    assert!(again.best_move.is_some());
}

#[test]
fn test_ponder_hit_after_deadline_stops() {
    let mut engine = engine(2);
    let limits = SearchLimits { ponder: true, move_time: Some(50), ..Default::default() };
    let handle = engine.start_search(&Position::startpos(), limits, Arc::new(NullListener)).unwrap();
    std::thread::sleep(Duration::from_millis(150));
    // Still pondering past the deadline
    assert!(!handle.is_finished());
    handle.ponder_hit();
    let outcome = handle.wait();
    assert!(outcome.best_move.is_some());
}

#[test]
fn test_dropping_handle_stops_search() {
    let mut engine = engine(2);
    let limits = SearchLimits { infinite: true, ..Default::default() };
    let handle = engine.start_search(&Position::startpos(), limits, Arc::new(NullListener)).unwrap();
    drop(handle);
    assert!(!engine.is_searching());
}

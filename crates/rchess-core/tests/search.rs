//! Search smoke tests through the public engine API

use std::sync::{Arc, Mutex};

use rchess_core::{
    Engine, EngineOptions, Position, PruneToggles, SearchInfo, SearchLimits, SearchListener, Value,
};

fn engine(options: EngineOptions) -> Engine {
    Engine::new(EngineOptions { hash_mb: 4, ..options }).unwrap()
}

fn best(fen: &str, depth: i32, options: EngineOptions) -> (String, Value) {
    let pos = Position::from_fen(fen).unwrap();
    let outcome = engine(options).search(&pos, SearchLimits::depth(depth)).unwrap();
    (outcome.best_move.to_string(), outcome.score)
}

#[test]
fn test_mate_in_one() {
    let (mv, score) = best("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3, EngineOptions::default());
    assert_eq!(mv, "a1a8");
    assert_eq!(score.mate_moves(), Some(1));
}

#[test]
fn test_mate_in_two() {
    // Rook ladder: Ra7 then Rb8#
    let (_, score) = best("6k1/8/8/8/8/8/R7/1R4K1 w - - 0 1", 5, EngineOptions::default());
    assert_eq!(score.mate_moves(), Some(2));
}

#[test]
fn test_avoids_being_mated() {
    // Black must stop Ra8#; only a move that covers the back rank keeps the game going
    let (mv, score) = best("6k1/5ppp/8/8/8/8/5PPP/R5K1 b - - 0 1", 4, EngineOptions::default());
    assert!(!score.is_loss(), "{mv} {score}");
}

#[test]
fn test_wins_material() {
    // Knight fork of king and queen
    let (mv, score) = best("4k3/8/8/5N2/2q5/8/4P3/4K3 w - - 0 1", 5, EngineOptions::default());
    assert_eq!(mv, "f5d6");
    assert!(score > Value::new(300));
}

#[test]
fn test_same_result_without_pruning_on_tactic() {
    let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let plain = EngineOptions { pruning: PruneToggles::none(), ..Default::default() };
    assert_eq!(best(fen, 4, plain), best(fen, 4, EngineOptions::default()));
}

#[test]
fn test_single_thread_is_deterministic() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let pos = Position::from_fen(fen).unwrap();
    let a = engine(EngineOptions::default()).search(&pos, SearchLimits::depth(6)).unwrap();
    let b = engine(EngineOptions::default()).search(&pos, SearchLimits::depth(6)).unwrap();
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
    assert_eq!(a.nodes, b.nodes);
}

#[test]
fn test_stalemate_is_draw() {
    // No legal move and no check: nothing to play
    let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let outcome = engine(EngineOptions::default()).search(&pos, SearchLimits::depth(3)).unwrap();
    assert!(outcome.best_move.is_none());
}

#[test]
fn test_draw_by_insufficient_material() {
    // Every line ends with at most a lone knight against a bare king
    let (mv, score) = best("8/8/8/8/8/4p3/3N4/k3K3 b - - 0 1", 4, EngineOptions::default());
    assert!(score.raw().abs() < 200, "{mv} {score}");
}

#[test]
fn test_won_pawn_ending_is_played_for_the_win() {
    // The king guards the queening square
    let (mv, score) = best("1K6/P7/2k5/8/8/8/8/8 w - - 0 1", 4, EngineOptions::default());
    assert_eq!(mv, "a7a8q");
    assert!(score > Value::new(500), "{score}");
}

#[test]
fn test_move_time_limit() {
    let pos = Position::startpos();
    let start = std::time::Instant::now();
    let outcome = engine(EngineOptions::default()).search(&pos, SearchLimits::move_time(200)).unwrap();
    let elapsed = start.elapsed().as_millis();
    assert!(outcome.best_move.is_some());
    assert!(elapsed >= 150, "stopped after {elapsed} ms");
    assert!(elapsed < 2000, "stopped after {elapsed} ms");
}

#[test]
fn test_node_limit() {
    let pos = Position::startpos();
    let limits = SearchLimits { nodes: Some(20_000), ..Default::default() };
    let outcome = engine(EngineOptions::default()).search(&pos, limits).unwrap();
    assert!(outcome.best_move.is_some());
    assert!(outcome.nodes < 40_000, "{} nodes", outcome.nodes);
}

#[test]
fn test_clock_limit_finishes() {
    let pos = Position::startpos();
    let limits = SearchLimits { wtime: Some(2_000), btime: Some(2_000), ..Default::default() };
    let start = std::time::Instant::now();
    let outcome = engine(EngineOptions::default()).search(&pos, limits).unwrap();
    assert!(outcome.best_move.is_some());
    assert!(start.elapsed().as_millis() < 1_500);
}

#[derive(Default)]
struct Collect(Mutex<Vec<SearchInfo>>);

impl SearchListener for Collect {
    fn on_info(&self, info: &SearchInfo) {
        self.0.lock().unwrap().push(info.clone());
    }
}

#[test]
fn test_pv_starts_with_best_move() {
    let mut engine = engine(EngineOptions::default());
    let listener = Arc::new(Collect::default());
    let pos = Position::startpos();
    let outcome = engine.start_search(&pos, SearchLimits::depth(5), listener.clone()).unwrap().wait();
    let infos = listener.0.lock().unwrap();
    let last = infos.last().unwrap();
    assert_eq!(last.pv.first(), Some(&outcome.best_move));
    assert!(last.pv.len() <= 12);
    assert!(last.nodes > 0);

    // Every PV move is legal in sequence
    let mut walk = pos.clone();
    for &mv in &last.pv {
        assert!(walk.is_valid_move(mv) && walk.is_legal(mv), "{mv}");
        walk.do_move(mv);
    }
}

#[test]
fn test_second_search_reuses_table() {
    let mut engine = engine(EngineOptions::default());
    let pos = Position::startpos();
    let first = engine.search(&pos, SearchLimits::depth(6)).unwrap();
    let second = engine.search(&pos, SearchLimits::depth(6)).unwrap();
    assert!(second.nodes <= first.nodes);
    assert!(engine.hashfull() > 0);
}

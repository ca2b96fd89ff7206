//! Transposition table under concurrent use

use std::sync::Arc;
use std::thread;

use rchess_core::types::{MoveKind, PieceType};
use rchess_core::{Bound, Move, Square, TranspositionTable, Value};

/// Key-dependent payload so a torn entry is detectable
fn payload(key: u64) -> (Move, Value, i32) {
    let from = Square::from_index((key % 64) as usize);
    let to = Square::from_index(((key >> 8) % 64) as usize);
    let mv = Move::new(from, to, PieceType::Knight, None, MoveKind::Normal);
    let score = Value::new((key >> 16) as i32 % 2000 - 1000);
    let depth = ((key >> 32) % 20) as i32 + 1;
    (mv, score, depth)
}

fn key_for(thread: u64, i: u64) -> u64 {
    (thread << 56 | i).wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1
}

#[test]
fn test_concurrent_store_probe_never_tears() {
    let tt = Arc::new(TranspositionTable::new(1).unwrap());
    let threads: Vec<_> = (0..4u64)
        .map(|t| {
            let tt = Arc::clone(&tt);
            thread::spawn(move || {
                for round in 0..4 {
                    for i in 0..20_000u64 {
                        let key = key_for(t, i);
                        if round % 2 == 0 {
                            let (mv, score, depth) = payload(key);
                            tt.store(key, score, 0, depth, Bound::Exact, mv);
                        } else if let Some(entry) = tt.probe(key) {
                            let (mv, score, depth) = payload(key);
                            assert_eq!(entry.mv(), mv);
                            assert_eq!(entry.score(0), score);
                            assert_eq!(entry.depth(), depth);
                        }
                    }
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }
    assert!(tt.hashfull() > 0);
}

#[test]
fn test_mate_score_survives_different_ply() {
    let tt = TranspositionTable::new(1).unwrap();
    let key = 0x0123_4567_89AB_CDEF;
    // Mate in 3 plies from a node at ply 5 of the search
    let score = Value::mate_in(8);
    let mv = Move::new(Square::A1, Square::A8, PieceType::Rook, None, MoveKind::Normal);
    tt.store(key, score, 5, 6, Bound::Exact, mv);
    let entry = tt.probe(key).unwrap();
    assert_eq!(entry.score(5), score);
    // Reached again two plies closer to the root: the mate is two plies nearer
    assert_eq!(entry.score(3), Value::mate_in(6));
}

#[test]
fn test_new_search_ages_entries() {
    let tt = TranspositionTable::new(1).unwrap();
    let key = 0x0F0F_0F0F_0F0F_0F0F;
    let mv = Move::new(Square::E2, Square::E4, PieceType::Pawn, None, MoveKind::Normal);
    tt.new_search(10);
    tt.store(key, Value::ZERO, 0, 5, Bound::Lower, mv);
    assert_eq!(tt.probe(key).unwrap().depth(), 5);
    tt.new_search(12);
    assert_eq!(tt.probe(key).unwrap().depth(), 3);
}

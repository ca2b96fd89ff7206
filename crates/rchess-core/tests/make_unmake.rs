//! Random move sequences: incremental state must match a full recomputation,
//! and unmaking must restore every field

use proptest::prelude::*;

use rchess_core::Position;
use rchess_core::eval::{Evaluator, MaterialPsqtEvaluator};
use rchess_core::movegen::{MoveList, generate_legal};

const FENS: [&str; 3] = [
    rchess_core::position::START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

#[derive(Debug, PartialEq, Eq)]
struct Snapshot {
    fen: String,
    key: u64,
    pawn_key: u64,
    material_key: u64,
    phase: i32,
    psq: (i32, i32),
}

fn snapshot(pos: &Position) -> Snapshot {
    Snapshot {
        fen: pos.to_fen(),
        key: pos.key(),
        pawn_key: pos.pawn_key(),
        material_key: pos.material_key(),
        phase: pos.phase(),
        psq: pos.psq_score(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_make_unmake_round_trip(start in 0usize..FENS.len(), picks in prop::collection::vec(any::<u16>(), 1..60)) {
        let mut pos = Position::from_fen(FENS[start]).unwrap();
        let mut played = Vec::new();
        let mut before = Vec::new();

        for pick in picks {
            let mut list = MoveList::new();
            generate_legal(&pos, &mut list);
            if list.is_empty() {
                break;
            }
            let mv = list.as_slice()[pick as usize % list.len()];
            before.push(snapshot(&pos));
            pos.do_move(mv);
            played.push(mv);

            prop_assert!(pos.validate().is_ok(), "{:?} after {}", pos.validate(), mv);
            prop_assert_eq!(pos.key(), pos.compute_key());
            prop_assert_eq!(pos.pawn_key(), pos.compute_pawn_key());
            // A FEN round trip rebuilds every incremental field from scratch
            let rebuilt = Position::from_fen(&pos.to_fen()).unwrap();
            prop_assert_eq!(pos.key(), rebuilt.key());
            prop_assert_eq!(pos.psq_score(), rebuilt.psq_score());
            prop_assert_eq!(pos.phase(), rebuilt.phase());
        }

        while let Some(mv) = played.pop() {
            pos.undo_move(mv);
            prop_assert_eq!(snapshot(&pos), before.pop().unwrap());
        }
    }

    #[test]
    fn test_eval_mirror_symmetry(start in 0usize..FENS.len(), picks in prop::collection::vec(any::<u16>(), 0..20)) {
        let mut pos = Position::from_fen(FENS[start]).unwrap();
        for pick in picks {
            let mut list = MoveList::new();
            generate_legal(&pos, &mut list);
            if list.is_empty() {
                break;
            }
            pos.do_move(list.as_slice()[pick as usize % list.len()]);
        }
        let mirrored = pos.mirrored();
        prop_assert_eq!(MaterialPsqtEvaluator.evaluate(&pos), MaterialPsqtEvaluator.evaluate(&mirrored));
    }
}

#[test]
fn test_null_move_round_trip() {
    let mut pos = Position::from_fen(FENS[1]).unwrap();
    let before = snapshot(&pos);
    pos.do_null_move();
    assert_ne!(pos.key(), before.key);
    assert_eq!(pos.key(), pos.compute_key());
    pos.undo_null_move();
    assert_eq!(snapshot(&pos), before);
}

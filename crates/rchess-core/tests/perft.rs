//! Move generator verification against published perft counts

use rchess_core::Position;
use rchess_core::movegen::{divide, perft};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const PROMOTIONS: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const TRICKY: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn check(fen: &str, expected: &[u64]) {
    let mut pos = Position::from_fen(fen).unwrap();
    for (i, &nodes) in expected.iter().enumerate() {
        let depth = i as u32 + 1;
        assert_eq!(perft(&mut pos, depth), nodes, "{fen} depth {depth}");
    }
    assert_eq!(pos.to_fen(), Position::from_fen(fen).unwrap().to_fen());
}

#[test]
fn test_perft_startpos() {
    check(rchess_core::position::START_FEN, &[20, 400, 8902, 197_281]);
}

#[test]
fn test_perft_kiwipete() {
    check(KIWIPETE, &[48, 2039, 97_862]);
}

#[test]
fn test_perft_endgame() {
    check(ENDGAME, &[14, 191, 2812, 43_238]);
}

#[test]
fn test_perft_promotions() {
    check(PROMOTIONS, &[6, 264, 9467]);
}

#[test]
fn test_perft_tricky() {
    check(TRICKY, &[44, 1486, 62_379]);
}

#[test]
fn test_divide_matches_perft() {
    let mut pos = Position::from_fen(KIWIPETE).unwrap();
    let split = divide(&mut pos, 3);
    assert_eq!(split.len(), 48);
    assert_eq!(split.iter().map(|&(_, n)| n).sum::<u64>(), 97_862);
}

#[test]
#[ignore = "slow without optimizations"]
fn test_perft_startpos_deep() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 5), 4_865_609);
    assert_eq!(divide(&mut pos, 5).iter().map(|&(_, n)| n).sum::<u64>(), 4_865_609);
    assert_eq!(perft(&mut pos, 6), 119_060_324);
}

//! Move-path enumeration (perft) for generator verification

use smallvec::SmallVec;

use crate::position::Position;
use crate::types::Move;

use super::generator::generate_legal;
use super::movelist::MoveList;

/// Number of leaf nodes `depth` plies below `pos`
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut list = MoveList::new();
    generate_legal(pos, &mut list);
    if depth == 1 {
        return list.len() as u64;
    }
    let mut nodes = 0;
    for &mv in list.iter() {
        pos.do_move(mv);
        nodes += perft(pos, depth - 1);
        pos.undo_move(mv);
    }
    nodes
}

/// Per-root-move leaf counts, in generation order
pub fn divide(pos: &mut Position, depth: u32) -> SmallVec<[(Move, u64); 64]> {
    let mut out = SmallVec::new();
    if depth == 0 {
        return out;
    }
    let mut list = MoveList::new();
    generate_legal(pos, &mut list);
    for &mv in list.iter() {
        pos.do_move(mv);
        let nodes = perft(pos, depth - 1);
        pos.undo_move(mv);
        out.push((mv, nodes));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_startpos_shallow() {
        let mut pos = Position::startpos();
        assert_eq!(perft(&mut pos, 1), 20);
        assert_eq!(perft(&mut pos, 2), 400);
        assert_eq!(perft(&mut pos, 3), 8902);
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut pos = Position::startpos();
        let split = divide(&mut pos, 3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 8902);
        let e2e4 = split.iter().find(|(m, _)| m.to_string() == "e2e4").map(|(_, n)| *n);
        assert_eq!(e2e4, Some(600));
    }
}

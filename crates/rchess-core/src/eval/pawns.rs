//! Pawn structure: doubled, isolated and passed pawns
//!
//! The score depends on the pawns alone, so it is cached by pawn key.

use crate::bitboard::Bitboard;
use crate::position::Position;
use crate::types::{Color, PieceType, Square};

const DOUBLED: (i32, i32) = (-10, -20);
const ISOLATED: (i32, i32) = (-10, -15);
/// Passed pawn bonus by relative rank
const PASSED_MG: [i32; 8] = [0, 5, 5, 10, 20, 35, 60, 0];
const PASSED_EG: [i32; 8] = [0, 10, 15, 25, 40, 65, 100, 0];

fn adjacent_files(file: u8) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    if file > 0 {
        bb |= Bitboard::file(file - 1);
    }
    if file < 7 {
        bb |= Bitboard::file(file + 1);
    }
    bb
}

/// Ranks strictly in front of `sq` from `color`'s side
fn ranks_ahead(color: Color, sq: Square) -> Bitboard {
    let ranks = match color {
        Color::White => (sq.rank() + 1)..8,
        Color::Black => 0..sq.rank(),
    };
    ranks.fold(Bitboard::EMPTY, |bb, rank| bb | Bitboard::rank(rank))
}

fn side_score(pos: &Position, us: Color) -> (i32, i32) {
    let ours = pos.pieces(us, PieceType::Pawn);
    let theirs = pos.pieces(us.opponent(), PieceType::Pawn);
    let (mut mg, mut eg) = (0, 0);

    for sq in ours {
        let file = Bitboard::file(sq.file());
        let neighbours = adjacent_files(sq.file());

        if (ours & file).more_than_one() {
            mg += DOUBLED.0;
            eg += DOUBLED.1;
        }
        if (ours & neighbours).is_empty() {
            mg += ISOLATED.0;
            eg += ISOLATED.1;
        }
        if (theirs & (file | neighbours) & ranks_ahead(us, sq)).is_empty() {
            let rank = sq.relative_rank(us) as usize;
            mg += PASSED_MG[rank];
            eg += PASSED_EG[rank];
        }
    }
    (mg, eg)
}

/// `(mg, eg)` from white's point of view
pub fn pawn_structure(pos: &Position) -> (i32, i32) {
    let (wm, we) = side_score(pos, Color::White);
    let (bm, be) = side_score(pos, Color::Black);
    (wm - bm, we - be)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(fen: &str) -> (i32, i32) {
        pawn_structure(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn test_startpos_is_zero() {
        assert_eq!(pawn_structure(&Position::startpos()), (0, 0));
    }

    #[test]
    fn test_passed_pawn_grows_with_rank() {
        let (_, eg4) = score("4k3/8/8/8/3P4/8/8/4K3 w - - 0 1");
        let (_, eg6) = score("4k3/8/3P4/8/8/8/8/4K3 w - - 0 1");
        assert!(eg6 > eg4 && eg4 > 0);
    }

    #[test]
    fn test_blocked_file_is_not_passed() {
        // d4 faces a black pawn on e6 on an adjacent file
        let (_, eg) = score("4k3/8/4p3/8/3P4/8/8/4K3 w - - 0 1");
        assert_eq!(eg, 0);
    }

    #[test]
    fn test_doubled_isolated_penalised() {
        let (doubled_mg, doubled_eg) = score("4k3/8/8/8/8/3P4/3P4/4K3 w - - 0 1");
        let (connected_mg, connected_eg) = score("4k3/8/8/8/8/8/2PP4/4K3 w - - 0 1");
        assert!(doubled_mg < 0 && doubled_eg < 0);
        assert!(connected_mg > doubled_mg && connected_eg > doubled_eg);
    }
}

//! Static exchange evaluation
//!
//! Plays out the capture sequence on one square, always recapturing with the
//! least valuable attacker, and lets each side stop when continuing loses
//! material. Sliders hidden behind a piece join the exchange once that piece
//! has captured, because attackers are recomputed from the reduced occupancy.

use crate::bitboard::Bitboard;
use crate::eval::material::MATERIAL;
use crate::position::Position;
use crate::types::{Color, Move, PieceType, Square};

const ATTACKER_ORDER: [PieceType; 6] = [
    PieceType::Pawn,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
    PieceType::King,
];

const PROMOTION_GAIN: i32 = MATERIAL[PieceType::Queen as usize] - MATERIAL[PieceType::Pawn as usize];

fn least_valuable_attacker(
    pos: &Position,
    to: Square,
    side: Color,
    occupied: Bitboard,
) -> Option<(Square, PieceType)> {
    let attackers = pos.attackers_to(to, occupied) & occupied & pos.pieces_of(side);
    if attackers.is_empty() {
        return None;
    }
    ATTACKER_ORDER.iter().find_map(|&pt| {
        let bb = attackers & pos.pieces(side, pt);
        bb.is_not_empty().then(|| (bb.lsb(), pt))
    })
}

/// Best material outcome for `side` if it may start capturing the piece worth
/// `target_value` on `to`, or decline
fn exchange(pos: &Position, to: Square, side: Color, occupied: Bitboard, target_value: i32) -> i32 {
    let Some((from, pt)) = least_valuable_attacker(pos, to, side, occupied) else {
        return 0;
    };
    let promotes = pt == PieceType::Pawn && to.relative_rank(side) == 7;
    let (gain, now_on_square) = if promotes {
        (target_value + PROMOTION_GAIN, MATERIAL[PieceType::Queen as usize])
    } else {
        (target_value, MATERIAL[pt as usize])
    };
    let reply = exchange(pos, to, side.opponent(), occupied ^ Bitboard::from_square(from), now_on_square);
    (gain - reply).max(0)
}

/// Material balance of `mv` for the moving side after the exchange on its
/// destination. The first capture is forced; later ones are optional.
pub fn see_capture(pos: &Position, mv: Move) -> i32 {
    let us = pos.side_to_move();
    let (from, to) = (mv.from(), mv.to());
    let mut occupied = pos.occupied() ^ Bitboard::from_square(from);

    let mut gain = match mv.captured() {
        Some(pt) => MATERIAL[pt as usize],
        None => 0,
    };
    if mv.is_en_passant() {
        occupied ^= Bitboard::from_square(Position::ep_victim_square(us, to));
    }
    let now_on_square = match mv.promotion_type() {
        Some(promo) => {
            gain += MATERIAL[promo as usize] - MATERIAL[PieceType::Pawn as usize];
            MATERIAL[promo as usize]
        }
        None => MATERIAL[mv.piece() as usize],
    };
    gain - exchange(pos, to, us.opponent(), occupied, now_on_square)
}

//! Move generator
//!
//! Generation is split by check state: not in check, single check (non-king
//! moves must capture the checker or block), double check (king moves only).
//! Pinned pieces stay on the line through their king. The output is
//! pseudo-legal only for king steps and en passant; `Position::is_legal`
//! settles those.

use crate::bitboard::{
    Bitboard, between_bb, bishop_attacks, king_attacks, knight_attacks, line_bb, pawn_attacks,
    queen_attacks, rook_attacks,
};
use crate::position::Position;
use crate::types::{Color, Move, MoveKind, PieceType, Square};

use super::MoveSink;
use super::movelist::MoveList;

/// Which moves to produce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    /// Non-captures without promotions (castling included)
    Quiets,
    /// Captures and all promotions (en passant included)
    Attacks,
    /// Both
    All,
}

impl GenType {
    #[inline]
    fn quiets(self) -> bool {
        self != GenType::Attacks
    }

    #[inline]
    fn attacks(self) -> bool {
        self != GenType::Quiets
    }
}

/// Destination filter for one generation pass
#[derive(Clone, Copy)]
struct GenerateTargets {
    /// Empty squares a quiet move may land on
    quiet: Bitboard,
    /// Enemy pieces that may be captured
    capture: Bitboard,
}

impl GenerateTargets {
    fn all(self) -> Bitboard {
        self.quiet | self.capture
    }
}

#[inline]
fn push_piece_moves<S: MoveSink>(
    pos: &Position,
    from: Square,
    pt: PieceType,
    destinations: Bitboard,
    sink: &mut S,
) {
    for to in destinations {
        sink.push_move(Move::new(from, to, pt, pos.piece_on(to), MoveKind::Normal));
    }
}

fn push_promotions<S: MoveSink>(
    from: Square,
    to: Square,
    captured: Option<PieceType>,
    under_promotions: bool,
    sink: &mut S,
) {
    sink.push_move(Move::new(from, to, PieceType::Pawn, captured, MoveKind::PromotionQueen));
    sink.push_move(Move::new(from, to, PieceType::Pawn, captured, MoveKind::PromotionKnight));
    if under_promotions {
        sink.push_move(Move::new(from, to, PieceType::Pawn, captured, MoveKind::PromotionRook));
        sink.push_move(Move::new(from, to, PieceType::Pawn, captured, MoveKind::PromotionBishop));
    }
}

/// Restrict a pinned piece to its pin line
#[inline]
fn pin_filter(pos: &Position, from: Square, bb: Bitboard) -> Bitboard {
    if pos.pinned().contains(from) {
        bb & line_bb(from, pos.king_square(pos.side_to_move()))
    } else {
        bb
    }
}

fn generate_pawn_moves<S: MoveSink>(
    pos: &Position,
    gen_type: GenType,
    targets: GenerateTargets,
    under_promotions: bool,
    sink: &mut S,
) {
    let us = pos.side_to_move();
    let push = us.pawn_push();
    let empty = !pos.occupied();

    for from in pos.pieces(us, PieceType::Pawn) {
        let promoting = from.relative_rank(us) == 6;

        // Pushes
        let one = from.offset(push);
        if empty.contains(one) {
            if promoting {
                if gen_type.attacks() && pin_filter(pos, from, targets.quiet).contains(one) {
                    push_promotions(from, one, None, under_promotions, sink);
                }
            } else if gen_type.quiets() {
                if pin_filter(pos, from, targets.quiet).contains(one) {
                    sink.push_move(Move::new(from, one, PieceType::Pawn, None, MoveKind::Normal));
                }
                if from.relative_rank(us) == 1 {
                    let two = one.offset(push);
                    if empty.contains(two) && pin_filter(pos, from, targets.quiet).contains(two) {
                        sink.push_move(Move::new(
                            from,
                            two,
                            PieceType::Pawn,
                            None,
                            MoveKind::DoublePawnPush,
                        ));
                    }
                }
            }
        }

        if !gen_type.attacks() {
            continue;
        }

        // Captures
        let captures = pin_filter(pos, from, pawn_attacks(us, from) & targets.capture);
        for to in captures {
            let captured = pos.piece_on(to);
            if promoting {
                push_promotions(from, to, captured, under_promotions, sink);
            } else {
                sink.push_move(Move::new(from, to, PieceType::Pawn, captured, MoveKind::Normal));
            }
        }

        // En passant; a discovered rank pin is left to `is_legal_ep_move`
        if let Some(ep) = pos.ep_square() {
            if pawn_attacks(us, from).contains(ep) {
                let victim = Position::ep_victim_square(us, ep);
                let resolves_check = pos.checkers().is_empty()
                    || targets.all().contains(ep)
                    || pos.checkers().contains(victim);
                if resolves_check && pin_filter(pos, from, Bitboard::from_square(ep)).is_not_empty() {
                    sink.push_move(Move::new(
                        from,
                        ep,
                        PieceType::Pawn,
                        Some(PieceType::Pawn),
                        MoveKind::EnPassant,
                    ));
                }
            }
        }
    }
}

fn generate_piece_moves<S: MoveSink>(
    pos: &Position,
    gen_type: GenType,
    targets: GenerateTargets,
    sink: &mut S,
) {
    let us = pos.side_to_move();
    let occupied = pos.occupied();
    let mut mask = Bitboard::EMPTY;
    if gen_type.quiets() {
        mask |= targets.quiet;
    }
    if gen_type.attacks() {
        mask |= targets.capture;
    }

    // A pinned knight can never move along its pin line
    for from in pos.pieces(us, PieceType::Knight) & !pos.pinned() {
        push_piece_moves(pos, from, PieceType::Knight, knight_attacks(from) & mask, sink);
    }
    for from in pos.pieces(us, PieceType::Bishop) {
        let bb = pin_filter(pos, from, bishop_attacks(from, occupied) & mask);
        push_piece_moves(pos, from, PieceType::Bishop, bb, sink);
    }
    for from in pos.pieces(us, PieceType::Rook) {
        let bb = pin_filter(pos, from, rook_attacks(from, occupied) & mask);
        push_piece_moves(pos, from, PieceType::Rook, bb, sink);
    }
    for from in pos.pieces(us, PieceType::Queen) {
        let bb = pin_filter(pos, from, queen_attacks(from, occupied) & mask);
        push_piece_moves(pos, from, PieceType::Queen, bb, sink);
    }
}

fn generate_king_moves<S: MoveSink>(pos: &Position, gen_type: GenType, sink: &mut S) {
    let us = pos.side_to_move();
    let them = us.opponent();
    let ksq = pos.king_square(us);

    // Squares behind the king on a checking slider's line stay attacked once the king steps back
    let occ_without_king = pos.occupied() ^ Bitboard::from_square(ksq);
    let mut checker_rays = Bitboard::EMPTY;
    for sq in pos.checkers() {
        checker_rays |= match pos.piece_on(sq) {
            Some(PieceType::Bishop) => bishop_attacks(sq, occ_without_king),
            Some(PieceType::Rook) => rook_attacks(sq, occ_without_king),
            Some(PieceType::Queen) => queen_attacks(sq, occ_without_king),
            _ => Bitboard::EMPTY,
        };
    }

    let base = king_attacks(ksq) & !checker_rays;
    let mut mask = Bitboard::EMPTY;
    if gen_type.quiets() {
        mask |= base & !pos.occupied();
    }
    if gen_type.attacks() {
        mask |= base & pos.pieces_of(them);
    }
    push_piece_moves(pos, ksq, PieceType::King, mask, sink);

    if gen_type.quiets() && !pos.in_check() && pos.castling_rights() != 0 {
        let candidates = match us {
            Color::White => [Square::G1, Square::C1],
            Color::Black => [Square::G8, Square::C8],
        };
        for king_to in candidates {
            if pos.is_valid_castling(king_to) {
                sink.push_move(Move::new(ksq, king_to, PieceType::King, None, MoveKind::Castling));
            }
        }
    }
}

/// Pseudo-legal generation into any sink
pub fn generate<S: MoveSink>(pos: &Position, gen_type: GenType, under_promotions: bool, sink: &mut S) {
    let us = pos.side_to_move();
    let checkers = pos.checkers();

    generate_king_moves(pos, gen_type, sink);
    if checkers.more_than_one() {
        return;
    }

    let block_mask = if checkers.is_empty() {
        Bitboard::ALL
    } else {
        let checker = checkers.lsb();
        between_bb(pos.king_square(us), checker) | checkers
    };
    let targets = GenerateTargets {
        quiet: !pos.occupied() & block_mask,
        capture: pos.pieces_of(us.opponent()) & block_mask,
    };

    generate_pawn_moves(pos, gen_type, targets, under_promotions, sink);
    generate_piece_moves(pos, gen_type, targets, sink);
}

/// Quiet moves for the search (no captures, no promotions)
pub fn generate_quiets_into<S: MoveSink>(pos: &Position, sink: &mut S) {
    generate(pos, GenType::Quiets, false, sink);
}

/// Captures and promotions for the search; rook and bishop promotions only when requested
pub fn generate_attacks_into<S: MoveSink>(pos: &Position, under_promotions: bool, sink: &mut S) {
    generate(pos, GenType::Attacks, under_promotions, sink);
}

/// Every legal move, all four promotion pieces included
pub fn generate_legal(pos: &Position, list: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate(pos, GenType::All, true, &mut pseudo);
    for &mv in pseudo.iter() {
        if pos.is_legal(mv) {
            list.push(mv);
        }
    }
}

/// Legal captures and promotions
pub fn generate_attacks(pos: &Position, list: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate(pos, GenType::Attacks, true, &mut pseudo);
    for &mv in pseudo.iter() {
        if pos.is_legal(mv) {
            list.push(mv);
        }
    }
}

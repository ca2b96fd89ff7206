//! Make / unmake

use crate::types::{Color, Move, MoveKind, PieceType, Square};

use super::Position;
use super::state::{BLACK_OO, BLACK_OOO, WHITE_OO, WHITE_OOO};
use super::zobrist::zobrist;

/// Rights lost when a piece leaves or lands on a square
const fn castling_mask() -> [u8; 64] {
    let mut mask = [0u8; 64];
    mask[Square::A1.index()] = WHITE_OOO;
    mask[Square::E1.index()] = WHITE_OO | WHITE_OOO;
    mask[Square::H1.index()] = WHITE_OO;
    mask[Square::A8.index()] = BLACK_OOO;
    mask[Square::E8.index()] = BLACK_OO | BLACK_OOO;
    mask[Square::H8.index()] = BLACK_OO;
    mask
}

static CASTLING_MASK: [u8; 64] = castling_mask();

/// Rook (from, to) for a castling move, keyed by the king's destination
#[inline]
pub(crate) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        _ => (Square::A8, Square::D8),
    }
}

impl Position {
    /// Square of the pawn removed by an en-passant capture landing on `to`
    #[inline]
    pub(crate) fn ep_victim_square(us: Color, to: Square) -> Square {
        to.offset(-us.pawn_push())
    }

    /// Play a legal move
    pub fn do_move(&mut self, mv: Move) {
        debug_assert!(mv.is_some());
        let z = zobrist();
        let us = self.side_to_move;
        let them = us.opponent();
        let (from, to) = (mv.from(), mv.to());
        let piece = mv.piece();

        self.history.push(self.st);
        self.st.halfmove_clock += 1;
        self.st.plies_from_null += 1;
        self.st.key ^= z.side;
        if let Some(ep) = self.st.ep_square.take() {
            self.st.key ^= z.ep_file[ep.file() as usize];
        }

        match mv.kind() {
            MoveKind::EnPassant => {
                self.remove_piece(them, PieceType::Pawn, Self::ep_victim_square(us, to));
            }
            _ => {
                if let Some(captured) = mv.captured() {
                    self.remove_piece(them, captured, to);
                }
            }
        }

        self.move_piece(us, piece, from, to);

        match mv.kind() {
            MoveKind::Castling => {
                let (rook_from, rook_to) = castling_rook_squares(to);
                self.move_piece(us, PieceType::Rook, rook_from, rook_to);
            }
            MoveKind::DoublePawnPush => {
                let ep = from.offset(us.pawn_push());
                // Recorded only if an enemy pawn can take, so keys of equal positions agree
                if (crate::bitboard::pawn_attacks(us, ep) & self.pieces(them, PieceType::Pawn))
                    .is_not_empty()
                {
                    self.st.ep_square = Some(ep);
                    self.st.key ^= z.ep_file[ep.file() as usize];
                }
            }
            _ => {
                if let Some(promo) = mv.promotion_type() {
                    self.remove_piece(us, PieceType::Pawn, to);
                    self.put_piece(us, promo, to);
                }
            }
        }

        let old_rights = self.st.castling;
        let new_rights = old_rights & !(CASTLING_MASK[from.index()] | CASTLING_MASK[to.index()]);
        if new_rights != old_rights {
            self.st.castling = new_rights;
            self.st.key ^= z.castling[old_rights as usize] ^ z.castling[new_rights as usize];
        }

        if piece == PieceType::Pawn || mv.is_capture() {
            self.st.halfmove_clock = 0;
        }

        self.side_to_move = them;
        self.move_counter += 1;
        self.update_check_info();

        #[cfg(feature = "consistency-checks")]
        debug_assert_eq!(self.validate(), Ok(()), "after {mv} in {self:?}");
    }

    /// Take back the last move; `mv` must be the move passed to `do_move`
    pub fn undo_move(&mut self, mv: Move) {
        let them = self.side_to_move;
        let us = them.opponent();
        let (from, to) = (mv.from(), mv.to());

        if let Some(promo) = mv.promotion_type() {
            self.remove_piece(us, promo, to);
            self.put_piece(us, PieceType::Pawn, to);
        }
        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to);
            self.move_piece(us, PieceType::Rook, rook_to, rook_from);
        }

        self.move_piece(us, mv.piece(), to, from);

        if mv.is_en_passant() {
            self.put_piece(them, PieceType::Pawn, Self::ep_victim_square(us, to));
        } else if let Some(captured) = mv.captured() {
            self.put_piece(them, captured, to);
        }

        self.side_to_move = us;
        self.move_counter -= 1;
        match self.history.pop() {
            Some(st) => self.st = st,
            None => debug_assert!(false, "undo_move without matching do_move"),
        }

        #[cfg(feature = "consistency-checks")]
        debug_assert_eq!(self.validate(), Ok(()), "after undo {mv} in {self:?}");
    }

    /// Pass the move to the opponent; only legal when not in check
    pub fn do_null_move(&mut self) {
        debug_assert!(!self.in_check());
        let z = zobrist();
        self.history.push(self.st);
        self.st.key ^= z.side;
        if let Some(ep) = self.st.ep_square.take() {
            self.st.key ^= z.ep_file[ep.file() as usize];
        }
        self.st.halfmove_clock += 1;
        self.st.plies_from_null = 0;
        self.side_to_move = self.side_to_move.opponent();
        self.update_check_info();
    }

    pub fn undo_null_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
        match self.history.pop() {
            Some(st) => self.st = st,
            None => debug_assert!(false, "undo_null_move without matching do_null_move"),
        }
    }
}

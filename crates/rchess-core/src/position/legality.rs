//! Legality checks for generated and stored moves

use crate::bitboard::{
    Bitboard, between_bb, bishop_attacks, king_attacks, knight_attacks, line_bb, pawn_attacks,
    queen_attacks, rook_attacks,
};
use crate::types::{Move, MoveKind, PieceType, Square};

use super::Position;
use super::state::{BLACK_OO, BLACK_OOO, WHITE_OO, WHITE_OOO};

impl Position {
    /// Final legality filter for a pseudo-legal move from the generator.
    ///
    /// Non-king moves already respect pins and check evasions; only king steps
    /// and en-passant captures need an extra test.
    pub fn is_legal(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        match mv.kind() {
            MoveKind::EnPassant => self.is_legal_ep_move(mv),
            MoveKind::Castling => true,
            _ if mv.piece() == PieceType::King => {
                let occupied = self.occupied ^ Bitboard::from_square(mv.from());
                !self.is_square_attacked(mv.to(), us.opponent(), occupied)
            }
            _ => true,
        }
    }

    /// An en-passant capture vacates two squares on the same rank, so a pin
    /// through both pawns is only visible after removing them
    pub fn is_legal_ep_move(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let ksq = self.king_square(us);
        let victim = Self::ep_victim_square(us, mv.to());
        let occupied = (self.occupied
            ^ Bitboard::from_square(mv.from())
            ^ Bitboard::from_square(victim))
            | Bitboard::from_square(mv.to());

        (rook_attacks(ksq, occupied) & self.rook_sliders(them)).is_empty()
            && (bishop_attacks(ksq, occupied) & self.bishop_sliders(them)).is_empty()
    }

    /// Whether a move taken from outside the generator (transposition table,
    /// killer slots, counter-move table) can be played in this position.
    ///
    /// Checks everything the generator guarantees except king safety, which
    /// `is_legal` handles afterwards.
    pub fn is_valid_move(&self, mv: Move) -> bool {
        if mv.is_none() || PieceType::from_index(mv.piece_index()).is_none() {
            return false;
        }
        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());
        let piece = mv.piece();

        if from == to
            || self.piece_on(from) != Some(piece)
            || !self.pieces_of(us).contains(from)
            || self.pieces_of(us).contains(to)
        {
            return false;
        }

        // Destination content must match the recorded capture
        match mv.kind() {
            MoveKind::EnPassant => {
                if piece != PieceType::Pawn
                    || self.ep_square() != Some(to)
                    || mv.captured() != Some(PieceType::Pawn)
                {
                    return false;
                }
            }
            _ => {
                if self.piece_on(to) != mv.captured() {
                    return false;
                }
                if mv.captured() == Some(PieceType::King) {
                    return false;
                }
            }
        }

        if mv.is_castling() {
            return piece == PieceType::King && self.is_valid_castling(to);
        }

        let checkers = self.checkers();
        if checkers.more_than_one() && piece != PieceType::King {
            return false;
        }

        let geometry_ok = match piece {
            PieceType::Pawn => self.is_valid_pawn_move(mv),
            _ if mv.kind() != MoveKind::Normal => false,
            PieceType::Knight => knight_attacks(from).contains(to),
            PieceType::Bishop => bishop_attacks(from, self.occupied).contains(to),
            PieceType::Rook => rook_attacks(from, self.occupied).contains(to),
            PieceType::Queen => queen_attacks(from, self.occupied).contains(to),
            PieceType::King => king_attacks(from).contains(to),
        };
        if !geometry_ok {
            return false;
        }

        if piece == PieceType::King {
            return true;
        }

        let ksq = self.king_square(us);
        if self.pinned().contains(from) && !line_bb(from, ksq).contains(to) {
            return false;
        }

        if checkers.is_not_empty() {
            let checker = checkers.lsb();
            let target = between_bb(ksq, checker) | checkers;
            let captures_checker_ep =
                mv.is_en_passant() && Self::ep_victim_square(us, to) == checker;
            if !target.contains(to) && !captures_checker_ep {
                return false;
            }
        }
        true
    }

    fn is_valid_pawn_move(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());
        let last_rank = to.relative_rank(us) == 7;
        if mv.is_promotion() != last_rank {
            return false;
        }
        match mv.kind() {
            MoveKind::Castling => false,
            MoveKind::EnPassant => pawn_attacks(us, from).contains(to),
            MoveKind::DoublePawnPush => {
                let mid = from.offset(us.pawn_push());
                from.relative_rank(us) == 1
                    && to == mid.offset(us.pawn_push())
                    && !self.occupied.contains(mid)
                    && !self.occupied.contains(to)
            }
            _ => {
                if mv.is_capture() {
                    pawn_attacks(us, from).contains(to)
                } else {
                    from.relative_rank(us) < 7
                        && to == from.offset(us.pawn_push())
                        && !self.occupied.contains(to)
                }
            }
        }
    }

    /// Rights, empty path between king and rook, and no attacked square on the king's path
    pub(crate) fn is_valid_castling(&self, king_to: Square) -> bool {
        if self.in_check() {
            return false;
        }
        let us = self.side_to_move;
        let (right, king_from, rook_from, king_path) = match king_to {
            Square::G1 => (WHITE_OO, Square::E1, Square::H1, [Square::F1, Square::G1]),
            Square::C1 => (WHITE_OOO, Square::E1, Square::A1, [Square::D1, Square::C1]),
            Square::G8 => (BLACK_OO, Square::E8, Square::H8, [Square::F8, Square::G8]),
            Square::C8 => (BLACK_OOO, Square::E8, Square::A8, [Square::D8, Square::C8]),
            _ => return false,
        };
        if self.castling_rights() & right == 0
            || king_from.relative_rank(us) != 0
            || self.king_square(us) != king_from
            || !self.pieces(us, PieceType::Rook).contains(rook_from)
        {
            return false;
        }
        if (between_bb(king_from, rook_from) & self.occupied).is_not_empty() {
            return false;
        }
        let them = us.opponent();
        king_path.iter().all(|&sq| !self.is_square_attacked(sq, them, self.occupied))
    }
}

#[cfg(test)]
mod tests {
    use crate::position::Position;
    use crate::types::{Move, MoveKind, PieceType, Square};

    #[test]
    fn test_is_valid_move_basic() {
        let pos = Position::startpos();
        let ok = Move::new(Square::E2, Square::E4, PieceType::Pawn, None, MoveKind::DoublePawnPush);
        let wrong_kind = Move::new(Square::E2, Square::E4, PieceType::Pawn, None, MoveKind::Normal);
        let wrong_piece = Move::new(Square::E2, Square::E4, PieceType::Knight, None, MoveKind::Normal);
        let blocked = Move::new(Square::A1, Square::A3, PieceType::Rook, None, MoveKind::Normal);
        let knight = Move::new(Square::G1, Square::F3, PieceType::Knight, None, MoveKind::Normal);
        assert!(pos.is_valid_move(ok));
        assert!(!pos.is_valid_move(wrong_kind));
        assert!(!pos.is_valid_move(wrong_piece));
        assert!(!pos.is_valid_move(blocked));
        assert!(pos.is_valid_move(knight));
        assert!(!pos.is_valid_move(Move::NONE));
    }

    #[test]
    fn test_is_valid_move_captured_must_match() {
        let pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let capture = Move::new(Square::E4, Square::D5, PieceType::Pawn, Some(PieceType::Pawn), MoveKind::Normal);
        let stale = Move::new(Square::E4, Square::D5, PieceType::Pawn, Some(PieceType::Knight), MoveKind::Normal);
        assert!(pos.is_valid_move(capture));
        assert!(!pos.is_valid_move(stale));
    }

    #[test]
    fn test_is_valid_move_respects_pin_and_check() {
        // Knight on e2 is pinned by the rook on e8
        let pos = Position::from_fen("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let pinned = Move::new(Square::E2, Square::C3, PieceType::Knight, None, MoveKind::Normal);
        assert!(!pos.is_valid_move(pinned));

        // In check from the rook: only blocks, captures or king moves
        let pos = Position::from_fen("4r2k/8/8/8/8/8/3N4/4K3 w - - 0 1").unwrap();
        let block = Move::new(Square::D2, Square::E4, PieceType::Knight, None, MoveKind::Normal);
        let ignore = Move::new(Square::D2, Square::B3, PieceType::Knight, None, MoveKind::Normal);
        assert!(pos.is_valid_move(block));
        assert!(!pos.is_valid_move(ignore));
    }

    #[test]
    fn test_castling_validity() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let oo = Move::new(Square::E1, Square::G1, PieceType::King, None, MoveKind::Castling);
        assert!(pos.is_valid_move(oo));
        // f1 attacked by a rook on f8
        let pos = Position::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
        assert!(!pos.is_valid_move(oo));
        let ooo = Move::new(Square::E1, Square::C1, PieceType::King, None, MoveKind::Castling);
        assert!(pos.is_valid_move(ooo));
    }

    #[test]
    fn test_ep_pin_detected() {
        // Capturing en passant would expose the king on a5 to the rook on h5
        let pos = Position::from_fen("8/8/8/KPp4r/8/8/8/7k w - c6 0 1").unwrap();
        let ep = Move::new(Square::B5, Square::C6, PieceType::Pawn, Some(PieceType::Pawn), MoveKind::EnPassant);
        assert!(pos.is_valid_move(ep));
        assert!(!pos.is_legal(ep));
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
        let into_file = Move::new(Square::E1, Square::D1, PieceType::King, None, MoveKind::Normal);
        let capture =
            Move::new(Square::E1, Square::D2, PieceType::King, Some(PieceType::Rook), MoveKind::Normal);
        assert!(!pos.is_legal(into_file));
        assert!(pos.is_legal(capture));
    }
}

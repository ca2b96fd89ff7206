//! Attack queries and check / pin / discovered-check detection

use crate::bitboard::{
    Bitboard, between_bb, bishop_attacks, bishop_pseudo_attacks, king_attacks, knight_attacks,
    pawn_attacks, rook_attacks, rook_pseudo_attacks,
};
use crate::types::{Color, PieceType, Square};

use super::Position;

impl Position {
    /// Pieces of both colors attacking `sq` given `occupied`
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        (pawn_attacks(Color::White, sq) & self.pieces(Color::Black, PieceType::Pawn))
            | (pawn_attacks(Color::Black, sq) & self.pieces(Color::White, PieceType::Pawn))
            | (knight_attacks(sq) & self.pieces_by_type(PieceType::Knight))
            | (king_attacks(sq) & self.pieces_by_type(PieceType::King))
            | (rook_attacks(sq, occupied)
                & (self.pieces_by_type(PieceType::Rook) | self.pieces_by_type(PieceType::Queen)))
            | (bishop_attacks(sq, occupied)
                & (self.pieces_by_type(PieceType::Bishop) | self.pieces_by_type(PieceType::Queen)))
    }

    /// `by` attacks `sq` given `occupied`
    pub fn is_square_attacked(&self, sq: Square, by: Color, occupied: Bitboard) -> bool {
        (pawn_attacks(by.opponent(), sq) & self.pieces(by, PieceType::Pawn)).is_not_empty()
            || (knight_attacks(sq) & self.pieces(by, PieceType::Knight)).is_not_empty()
            || (king_attacks(sq) & self.pieces(by, PieceType::King)).is_not_empty()
            || (rook_attacks(sq, occupied) & self.rook_sliders(by)).is_not_empty()
            || (bishop_attacks(sq, occupied) & self.bishop_sliders(by)).is_not_empty()
    }

    /// Enemy sliders aimed at `king_color`'s king through exactly one piece:
    /// returns (direct slider checkers, single blockers)
    fn slider_rays(&self, king_color: Color) -> (Bitboard, Bitboard) {
        let ksq = self.king_square(king_color);
        let them = king_color.opponent();
        let snipers = (rook_pseudo_attacks(ksq) & self.rook_sliders(them))
            | (bishop_pseudo_attacks(ksq) & self.bishop_sliders(them));

        let mut checkers = Bitboard::EMPTY;
        let mut blockers = Bitboard::EMPTY;
        for sniper in snipers {
            let between = between_bb(ksq, sniper) & self.occupied;
            if between.is_empty() {
                checkers.set(sniper);
            } else if !between.more_than_one() {
                blockers |= between;
            }
        }
        (checkers, blockers)
    }

    /// Recompute `checkers`, `pinned` and `discovered` for the side to move
    pub(super) fn update_check_info(&mut self) {
        let us = self.side_to_move;
        let them = us.opponent();
        let ksq = self.king_square(us);

        let (slider_checkers, our_blockers) = self.slider_rays(us);
        self.st.checkers = slider_checkers
            | (knight_attacks(ksq) & self.pieces(them, PieceType::Knight))
            | (pawn_attacks(us, ksq) & self.pieces(them, PieceType::Pawn));
        self.st.pinned = our_blockers & self.pieces_of(us);

        let (_, their_blockers) = self.slider_rays(them);
        self.st.discovered = their_blockers & self.pieces_of(us);
    }
}

#[cfg(test)]
mod tests {
    use crate::position::Position;
    use crate::types::{Color, Square};

    #[test]
    fn test_checkers_knight_and_slider() {
        // Black knight on d3 and rook on e8 both check the white king on e1
        let pos = Position::from_fen("4r2k/8/8/8/8/3n4/8/4K3 w - - 0 1").unwrap();
        assert_eq!(pos.checkers().count(), 2);
        assert!(pos.checkers().contains(Square::D3));
        assert!(pos.checkers().contains(Square::E8));
    }

    #[test]
    fn test_pinned_piece() {
        let pos = Position::from_fen("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(!pos.in_check());
        assert!(pos.pinned().contains(Square::E2));
        assert_eq!(pos.pinned().count(), 1);
    }

    #[test]
    fn test_discovered_candidate() {
        // Moving the white knight from e4 uncovers the rook on e1 against the king on e8
        let pos = Position::from_fen("4k3/8/8/8/4N3/8/8/K3R3 w - - 0 1").unwrap();
        assert!(pos.discovered().contains(Square::E4));
        assert!(pos.pinned().is_empty());
    }

    #[test]
    fn test_square_attacked() {
        let pos = Position::startpos();
        let occ = pos.occupied();
        assert!(pos.is_square_attacked(Square::F3, Color::White, occ));
        assert!(!pos.is_square_attacked(Square::E4, Color::White, occ));
        assert!(pos.is_square_attacked(Square::F6, Color::Black, occ));
        assert_eq!(pos.attackers_to(Square::F3, occ).count(), 3);
    }
}

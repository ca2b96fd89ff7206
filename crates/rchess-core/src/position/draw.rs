//! Repetition and insufficient-material detection

use crate::types::{Color, Move, PieceType};

use super::{Position, kpk};

/// Repetitions are only looked for within this many plies
const REPETITION_WINDOW: usize = 50;

impl Position {
    /// The position after `last_move` repeats an earlier one with the same side to move.
    ///
    /// Captures and pawn moves are irreversible, so nothing before them can repeat.
    pub fn is_repetition(&self, last_move: Move) -> bool {
        if last_move.is_capture() || last_move.piece() == PieceType::Pawn {
            return false;
        }
        let limit = (self.st.halfmove_clock as usize)
            .min(self.st.plies_from_null as usize)
            .min(REPETITION_WINDOW)
            .min(self.history.len());
        let len = self.history.len();
        (4..=limit)
            .step_by(2)
            .any(|back| self.history[len - back].key == self.st.key)
    }

    /// Neither side can mate: bare kings, a lone minor on either side, two knights
    /// against a bare king, or a king-and-pawn ending the KPK bitbase calls drawn
    pub fn is_draw_by_material(&self) -> bool {
        let count = |c: Color, pt: PieceType| self.material_count(c, pt);
        let majors = |c: Color| count(c, PieceType::Rook) + count(c, PieceType::Queen);
        let pawns = |c: Color| count(c, PieceType::Pawn);
        let minors = |c: Color| count(c, PieceType::Knight) + count(c, PieceType::Bishop);

        if majors(Color::White) + majors(Color::Black) != 0 {
            return false;
        }

        let (w_pawns, b_pawns) = (pawns(Color::White), pawns(Color::Black));
        if w_pawns + b_pawns == 0 {
            let (w, b) = (minors(Color::White), minors(Color::Black));
            if w <= 1 && b <= 1 {
                return true;
            }
            let knights_only = |c: Color| count(c, PieceType::Bishop) == 0 && count(c, PieceType::Knight) == 2;
            return (w == 0 && knights_only(Color::Black)) || (b == 0 && knights_only(Color::White));
        }

        if w_pawns + b_pawns == 1 && minors(Color::White) + minors(Color::Black) == 0 {
            let strong = if w_pawns == 1 { Color::White } else { Color::Black };
            return kpk::is_draw(
                strong,
                self.king_square(strong),
                self.pieces(strong, PieceType::Pawn).lsb(),
                self.king_square(strong.opponent()),
                self.side_to_move(),
            );
        }
        false
    }
}

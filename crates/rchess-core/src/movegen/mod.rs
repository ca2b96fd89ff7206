//! Move generation
//!
//! - `MoveList`: fixed-capacity list for one position
//! - `generate_legal` / `generate_attacks`: legal moves into a `MoveList`
//! - `generate_quiets_into` / `generate_attacks_into`: pseudo-legal moves into
//!   any `MoveSink` (the search writes straight into its per-ply buffer)
//! - `perft` / `divide`

mod generator;
mod movelist;
mod perft;

pub use generator::{
    GenType, generate, generate_attacks, generate_attacks_into, generate_legal,
    generate_quiets_into,
};
pub use movelist::MoveList;
pub use perft::{divide, perft};

use crate::error::MoveParseError;
use crate::position::Position;
use crate::types::{Move, Square};

/// Destination for generated moves
pub trait MoveSink {
    fn push_move(&mut self, mv: Move);
}

impl Position {
    /// Parse long algebraic notation (`e2e4`, `e7e8q`) against the legal moves
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let syntax = || MoveParseError::Syntax(text.to_string());
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(syntax());
        }
        let from = Square::parse(&text[0..2]).ok_or_else(syntax)?;
        let to = Square::parse(&text[2..4]).ok_or_else(syntax)?;
        let promo = match text.as_bytes().get(4) {
            None => None,
            Some(b'q') => Some(crate::types::PieceType::Queen),
            Some(b'r') => Some(crate::types::PieceType::Rook),
            Some(b'b') => Some(crate::types::PieceType::Bishop),
            Some(b'n') => Some(crate::types::PieceType::Knight),
            Some(_) => return Err(syntax()),
        };

        let mut list = MoveList::new();
        generate_legal(self, &mut list);
        list.iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion_type() == promo)
            .ok_or_else(|| MoveParseError::Illegal(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let pos = Position::startpos();
        let mv = pos.parse_move("g1f3").unwrap();
        assert_eq!(mv.to_string(), "g1f3");
        assert_eq!(pos.parse_move("e2e5"), Err(MoveParseError::Illegal("e2e5".into())));
        assert_eq!(pos.parse_move("e2"), Err(MoveParseError::Syntax("e2".into())));
        assert_eq!(pos.parse_move("e2e4x"), Err(MoveParseError::Syntax("e2e4x".into())));
    }

    #[test]
    fn test_parse_promotion() {
        let pos = Position::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert!(pos.parse_move("a7a8").is_err());
        let mv = pos.parse_move("a7a8n").unwrap();
        assert_eq!(mv.promotion_type(), Some(crate::types::PieceType::Knight));
    }
}

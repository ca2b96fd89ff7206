//! Fixed-capacity move list

use crate::types::{MAX_MOVES, Move};

use super::MoveSink;

/// Stack-allocated list of at most `MAX_MOVES` moves
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[inline]
    pub const fn new() -> Self {
        Self { moves: [Move::NONE; MAX_MOVES], len: 0 }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves[..self.len].iter()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

impl MoveSink for MoveList {
    #[inline]
    fn push_move(&mut self, mv: Move) {
        self.push(mv);
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MoveKind, PieceType, Square};

    #[test]
    fn test_movelist_push_and_index() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let mv = Move::new(Square::G1, Square::F3, PieceType::Knight, None, MoveKind::Normal);
        list.push(mv);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], mv);
        assert!(list.contains(mv));
        list.clear();
        assert!(!list.contains(mv));
    }

    #[test]
    fn test_movelist_iter() {
        let mut list = MoveList::new();
        list.push(Move::new(Square::E2, Square::E3, PieceType::Pawn, None, MoveKind::Normal));
        list.push(Move::new(Square::E2, Square::E4, PieceType::Pawn, None, MoveKind::DoublePawnPush));
        assert_eq!(list.iter().count(), 2);
        assert_eq!((&list).into_iter().filter(|m| m.kind() == MoveKind::DoublePawnPush).count(), 1);
    }
}

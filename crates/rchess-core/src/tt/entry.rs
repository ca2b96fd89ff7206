//! Packed entry layout
//!
//! ```text
//! bits  0..22  move
//! bits 22..38  score (i16, mate scores stored relative to the node)
//! bits 38..54  aged depth (depth + generation, wrapping u16)
//! bits 54..56  bound
//! ```

use crate::types::{Bound, Depth, Move, Value};

const MOVE_MASK: u64 = (1 << Move::BITS) - 1;
const SCORE_SHIFT: u32 = 22;
const AGED_DEPTH_SHIFT: u32 = 38;
const BOUND_SHIFT: u32 = 54;

/// Pack one entry. `score` must already be adjusted for storage.
#[inline]
pub(super) fn pack(mv: Move, score: i16, aged_depth: u16, bound: Bound) -> u64 {
    (mv.raw() as u64 & MOVE_MASK)
        | ((score as u16 as u64) << SCORE_SHIFT)
        | ((aged_depth as u64) << AGED_DEPTH_SHIFT)
        | (bound.bits() << BOUND_SHIFT)
}

#[inline]
pub(super) fn aged_depth(data: u64) -> u16 {
    (data >> AGED_DEPTH_SHIFT) as u16
}

#[inline]
pub(super) fn bound(data: u64) -> Bound {
    Bound::from_bits((data >> BOUND_SHIFT) & 3)
}

/// Mate scores become distances from the storing node
#[inline]
pub(super) fn score_to_tt(score: Value, ply: i32) -> i16 {
    let s = score.raw();
    let adjusted = if s > Value::MATE_BOUND.raw() {
        s + ply
    } else if s < -Value::MATE_BOUND.raw() {
        s - ply
    } else {
        s
    };
    adjusted.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[inline]
fn score_from_tt(stored: i16, ply: i32) -> Value {
    let s = stored as i32;
    if s > Value::MATE_BOUND.raw() {
        Value::new(s - ply)
    } else if s < -Value::MATE_BOUND.raw() {
        Value::new(s + ply)
    } else {
        Value::new(s)
    }
}

/// A decoded table entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    mv: Move,
    stored_score: i16,
    depth: Depth,
    bound: Bound,
}

impl TtEntry {
    pub(super) fn decode(data: u64, generation: u16) -> TtEntry {
        TtEntry {
            mv: Move::from_raw((data & MOVE_MASK) as u32),
            stored_score: (data >> SCORE_SHIFT) as u16 as i16,
            depth: aged_depth(data).wrapping_sub(generation) as i16 as Depth,
            bound: bound(data),
        }
    }

    /// Best move found for the position, may be `Move::NONE`
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Score seen from a node `ply` plies below the root
    #[inline]
    pub fn score(&self, ply: i32) -> Value {
        score_from_tt(self.stored_score, ply)
    }

    /// Search depth, minus the number of plies played since it was stored
    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    #[inline]
    pub fn bound(&self) -> Bound {
        self.bound
    }

    /// Whether the stored bound lets `score` stand in for a static eval of `eval`
    #[inline]
    pub fn can_refine_eval(&self, eval: i32, score: i32) -> bool {
        match self.bound {
            Bound::Exact => true,
            Bound::Upper => score < eval,
            Bound::Lower => score > eval,
            Bound::None => false,
        }
    }
}

//! Static evaluation
//!
//! The search only needs "position -> centipawns from the side to move";
//! everything else about evaluation lives behind the `Evaluator` trait.
//! `MaterialPsqtEvaluator` is the built-in reference implementation.
//! Search threads pass their own `EvalCaches` through `evaluate_with`.

pub mod cache;
pub mod material;
pub mod pawns;
pub mod psqt;

use std::sync::Arc;

use crate::position::Position;
use crate::types::{Color, PieceType};

pub use cache::{EvalCaches, KeyedCache};

use material::{MATERIAL, TOTAL_PHASE};
use pawns::pawn_structure;

/// Static evaluator used by the search
pub trait Evaluator: Send + Sync {
    /// Score in centipawns from the side to move's point of view
    fn evaluate(&self, pos: &Position) -> i32;

    /// Same score as `evaluate`; evaluators with terms keyed by the pawn key
    /// or the material signature may look them up in `caches`
    fn evaluate_with(&self, pos: &Position, caches: &mut EvalCaches) -> i32 {
        let _ = caches;
        self.evaluate(pos)
    }
}

impl<T: Evaluator + ?Sized> Evaluator for Arc<T> {
    #[inline]
    fn evaluate(&self, pos: &Position) -> i32 {
        (**self).evaluate(pos)
    }

    #[inline]
    fn evaluate_with(&self, pos: &Position, caches: &mut EvalCaches) -> i32 {
        (**self).evaluate_with(pos, caches)
    }
}

/// Material, pawn structure and tapered piece-square tables
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialPsqtEvaluator;

impl MaterialPsqtEvaluator {
    /// Material balance from white, a function of the material signature only
    pub fn material_balance(pos: &Position) -> i32 {
        PieceType::ALL[..5]
            .iter()
            .map(|&pt| {
                let diff = pos.material_count(Color::White, pt) as i32
                    - pos.material_count(Color::Black, pt) as i32;
                MATERIAL[pt as usize] * diff
            })
            .sum()
    }

    fn blend(pos: &Position, material: i32, pawns: (i32, i32)) -> i32 {
        let (psq_mg, psq_eg) = pos.psq_score();
        let phase = pos.phase().clamp(0, TOTAL_PHASE);
        let mg = material + psq_mg + pawns.0;
        let eg = material + psq_eg + pawns.1;
        (mg * phase + eg * (TOTAL_PHASE - phase)) / TOTAL_PHASE
    }

    /// Score from white's point of view
    pub fn evaluate_white(&self, pos: &Position) -> i32 {
        Self::blend(pos, Self::material_balance(pos), pawn_structure(pos))
    }

    fn from_side_to_move(pos: &Position, white_score: i32) -> i32 {
        match pos.side_to_move() {
            Color::White => white_score,
            Color::Black => -white_score,
        }
    }
}

impl Evaluator for MaterialPsqtEvaluator {
    #[inline]
    fn evaluate(&self, pos: &Position) -> i32 {
        Self::from_side_to_move(pos, self.evaluate_white(pos))
    }

    fn evaluate_with(&self, pos: &Position, caches: &mut EvalCaches) -> i32 {
        let material = match caches.material.get(pos.material_key()) {
            Some(m) => m,
            None => {
                let m = Self::material_balance(pos);
                caches.material.insert(pos.material_key(), m);
                m
            }
        };
        let pawns = match caches.pawns.get(pos.pawn_key()) {
            Some(p) => p,
            None => {
                let p = pawn_structure(pos);
                caches.pawns.insert(pos.pawn_key(), p);
                p
            }
        };
        Self::from_side_to_move(pos, Self::blend(pos, material, pawns))
    }
}

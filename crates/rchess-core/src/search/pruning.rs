//! Pruning and reduction stages
//!
//! - node level: static null move, razoring, null move
//! - move level: late move pruning, futility, SEE pruning
//! - late move reductions
//! - quiescence delta pruning
//!
//! Each stage is a pure decision; the caller does the searching. Every stage
//! can be switched off through `PruneToggles`.

use serde::{Deserialize, Serialize};

use crate::eval::material::MATERIAL;
use crate::types::{Depth, Move, Value};

use super::constants::{
    FUTILITY_MARGIN, LMP_MAX_DEPTH, LMR_GOOD_HISTORY, Q_FUTILITY_MARGIN, RAZORING_MARGIN,
    SEE_PRUNING_MAX_DEPTH, STATIC_NULL_MOVE_MARGIN, lmr_base,
};

/// On/off switch per stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneToggles {
    pub static_null_move: bool,
    pub razoring: bool,
    pub null_move: bool,
    pub late_move_pruning: bool,
    pub futility: bool,
    pub see_pruning: bool,
    pub late_move_reduction: bool,
    pub q_delta_pruning: bool,
    pub aspiration_windows: bool,
    pub check_extension: bool,
    pub mate_distance_pruning: bool,
}

impl Default for PruneToggles {
    fn default() -> Self {
        Self::all_enabled()
    }
}

impl PruneToggles {
    pub const fn all_enabled() -> Self {
        Self {
            static_null_move: true,
            razoring: true,
            null_move: true,
            late_move_pruning: true,
            futility: true,
            see_pruning: true,
            late_move_reduction: true,
            q_delta_pruning: true,
            aspiration_windows: true,
            check_extension: true,
            mate_distance_pruning: true,
        }
    }

    /// Plain alpha-beta; check extension stays on
    pub const fn none() -> Self {
        Self {
            static_null_move: false,
            razoring: false,
            null_move: false,
            late_move_pruning: false,
            futility: false,
            see_pruning: false,
            late_move_reduction: false,
            q_delta_pruning: false,
            aspiration_windows: false,
            check_extension: true,
            mate_distance_pruning: true,
        }
    }
}

// =============================================================================
// Node level
// =============================================================================

/// Static eval beats beta by a depth-scaled margin: return the eval
#[inline]
pub fn static_null_move(toggles: &PruneToggles, depth: Depth, eval: Value, beta: Value) -> Option<Value> {
    if !toggles.static_null_move {
        return None;
    }
    let margin = *STATIC_NULL_MOVE_MARGIN.get(depth as usize)?;
    (eval - margin >= beta).then_some(eval)
}

/// Static eval so far below alpha that a quiescence check is enough.
/// Returns the margin to verify with.
#[inline]
pub fn razoring_margin(toggles: &PruneToggles, depth: Depth, eval: Value, alpha: Value) -> Option<i32> {
    if !toggles.razoring || alpha.raw().abs() >= Value::MATE_BOUND.raw() {
        return None;
    }
    let margin = *RAZORING_MARGIN.get(depth as usize)?;
    (eval + margin < alpha).then_some(margin)
}

/// Reduction for a null-move search, or `None` when it is not tried
#[inline]
pub fn null_move_reduction(
    toggles: &PruneToggles,
    null_move_count: u32,
    depth: Depth,
    eval: Value,
    beta: Value,
    has_non_pawn_material: bool,
) -> Option<Depth> {
    if !toggles.null_move || null_move_count >= 2 || eval < beta || !has_non_pawn_material {
        return None;
    }
    Some(depth / 4 + 3 + ((eval - beta).raw() / 80).min(3))
}

// =============================================================================
// Move level
// =============================================================================

/// Enough quiet moves tried at a shallow node
#[inline]
pub fn late_move_prune(toggles: &PruneToggles, depth: Depth, moves_played: usize) -> bool {
    toggles.late_move_pruning && depth <= LMP_MAX_DEPTH && moves_played as Depth >= depth * 3 + 3
}

/// A quiet move cannot lift the static eval over alpha
#[inline]
pub fn futility_prune(toggles: &PruneToggles, depth: Depth, eval: Value, alpha: Value, mv: Move) -> bool {
    if !toggles.futility || mv.is_pawn_push_78() {
        return false;
    }
    match FUTILITY_MARGIN.get(depth as usize) {
        Some(&margin) => eval + margin <= alpha,
        None => false,
    }
}

/// A capture that loses material by more than the depth allows.
/// `see` is only evaluated when the depth qualifies.
#[inline]
pub fn see_prune(toggles: &PruneToggles, depth: Depth, see: impl FnOnce() -> i32) -> bool {
    toggles.see_pruning && depth <= SEE_PRUNING_MAX_DEPTH && see() < -20 * depth * depth
}

// =============================================================================
// Reductions
// =============================================================================

/// Inputs for the late move reduction of one move
#[derive(Clone, Copy, Debug)]
pub struct LmrInput {
    pub depth: Depth,
    pub moves_played: usize,
    pub order_score: i32,
    pub killer_or_counter: bool,
    pub pv_node: bool,
}

/// Depth to subtract for a late quiet move, always in `[1, depth - 1]`
pub fn late_move_reduction(input: LmrInput) -> Depth {
    let mut r = lmr_base(input.depth, input.moves_played);
    if input.order_score > LMR_GOOD_HISTORY {
        r -= 1;
    }
    if input.killer_or_counter {
        r -= 1;
    }
    if !input.pv_node {
        r += 1;
    }
    r.max(1).min(input.depth - 1)
}

// =============================================================================
// Quiescence
// =============================================================================

/// Even winning the captured piece leaves the score below alpha
#[inline]
pub fn delta_prune(toggles: &PruneToggles, eval: Value, mv: Move, alpha: Value) -> bool {
    toggles.q_delta_pruning
        && !mv.is_promotion()
        && eval + Q_FUTILITY_MARGIN + MATERIAL[mv.captured_index()] < alpha
}

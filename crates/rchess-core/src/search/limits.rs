//! Search limits

use serde::{Deserialize, Serialize};

use crate::types::{Color, Depth};

/// What bounds a search. Times are in milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Stop after completing this depth
    pub depth: Option<Depth>,
    /// Think exactly this long
    pub move_time: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub moves_to_go: Option<u32>,
    /// Search until stopped
    pub infinite: bool,
    /// Search the expected reply until ponder-hit or stop
    pub ponder: bool,
    /// Stop after roughly this many nodes
    pub nodes: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: Depth) -> Self {
        Self { depth: Some(depth), ..Default::default() }
    }

    pub fn move_time(ms: u64) -> Self {
        Self { move_time: Some(ms), ..Default::default() }
    }

    /// Remaining clock time of `side`
    pub fn time_left(&self, side: Color) -> Option<u64> {
        match side {
            Color::White => self.wtime,
            Color::Black => self.btime,
        }
    }

    /// Increment of `side`
    pub fn increment(&self, side: Color) -> u64 {
        match side {
            Color::White => self.winc,
            Color::Black => self.binc,
        }
        .unwrap_or(0)
    }

    /// Nothing but an explicit stop ends the search
    pub fn is_unbounded(&self) -> bool {
        self.infinite
            || (self.depth.is_none()
                && self.move_time.is_none()
                && self.wtime.is_none()
                && self.btime.is_none()
                && self.nodes.is_none())
    }
}

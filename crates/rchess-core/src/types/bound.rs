//! Score bound stored alongside a search result

/// Bound type of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Bound {
    #[default]
    None = 0,
    /// Fail-low: true score <= stored score
    Upper = 1,
    /// Fail-high: true score >= stored score
    Lower = 2,
    Exact = 3,
}

impl Bound {
    /// Decode the 2-bit field of a table entry
    #[inline]
    pub const fn from_bits(bits: u64) -> Bound {
        match bits & 3 {
            1 => Bound::Upper,
            2 => Bound::Lower,
            3 => Bound::Exact,
            _ => Bound::None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self as u64
    }

    /// True when a score with this bound proves `score >= beta`-style cutoffs
    #[inline]
    pub const fn is_lower_or_exact(self) -> bool {
        matches!(self, Bound::Lower | Bound::Exact)
    }

    #[inline]
    pub const fn is_upper_or_exact(self) -> bool {
        matches!(self, Bound::Upper | Bound::Exact)
    }
}

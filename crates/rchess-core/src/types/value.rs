//! Search scores (Value)
//!
//! Centipawns from the side to move. Scores at or beyond `MATE_BOUND` encode a
//! forced mate; the distance to mate is `MATE - |score|` plies.

/// Search score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Value(i32);

impl Value {
    /// Zero
    pub const ZERO: Value = Value(0);
    /// Draw score
    pub const DRAW: Value = Value(0);
    /// Mate at the current node
    pub const MATE: Value = Value(32000);
    /// Larger than any reachable score
    pub const INFINITE: Value = Value(32001);
    /// Invalid / not computed
    pub const NONE: Value = Value(32002);

    /// Scores with a larger magnitude are mate scores; the transposition table
    /// adjusts these by the ply distance
    pub const MATE_BOUND: Value = Value(30000);

    #[inline]
    pub const fn new(v: i32) -> Value {
        Value(v)
    }

    /// Score for delivering mate `ply` plies from the root
    #[inline]
    pub const fn mate_in(ply: i32) -> Value {
        Value(Self::MATE.0 - ply)
    }

    /// Score for being mated `ply` plies from the root
    #[inline]
    pub const fn mated_in(ply: i32) -> Value {
        Value(-Self::MATE.0 + ply)
    }

    #[inline]
    pub const fn is_win(self) -> bool {
        self.0 > Self::MATE_BOUND.0 && self.0 <= Self::MATE.0
    }

    #[inline]
    pub const fn is_loss(self) -> bool {
        self.0 < -Self::MATE_BOUND.0 && self.0 >= -Self::MATE.0
    }

    #[inline]
    pub const fn is_mate_score(self) -> bool {
        self.is_win() || self.is_loss()
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Plies to mate (0 for non-mate scores)
    #[inline]
    pub const fn mate_ply(self) -> i32 {
        if self.is_win() {
            Self::MATE.0 - self.0
        } else if self.is_loss() {
            self.0 + Self::MATE.0
        } else {
            0
        }
    }

    /// Full moves to mate, signed like a UCI `score mate` (negative when being mated)
    #[inline]
    pub const fn mate_moves(self) -> Option<i32> {
        if self.is_win() {
            Some((self.mate_ply() + 1) / 2)
        } else if self.is_loss() {
            Some(-(self.mate_ply() + 1) / 2)
        } else {
            None
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::ZERO
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mate_moves() {
            Some(m) => write!(f, "mate {m}"),
            None => write!(f, "cp {}", self.0),
        }
    }
}

impl std::ops::Neg for Value {
    type Output = Value;

    #[inline]
    fn neg(self) -> Value {
        Value(-self.0)
    }
}

impl std::ops::Add for Value {
    type Output = Value;

    #[inline]
    fn add(self, rhs: Value) -> Value {
        Value(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Value {
    type Output = Value;

    #[inline]
    fn sub(self, rhs: Value) -> Value {
        Value(self.0 - rhs.0)
    }
}

impl std::ops::Add<i32> for Value {
    type Output = Value;

    #[inline]
    fn add(self, rhs: i32) -> Value {
        Value(self.0 + rhs)
    }
}

impl std::ops::Sub<i32> for Value {
    type Output = Value;

    #[inline]
    fn sub(self, rhs: i32) -> Value {
        Value(self.0 - rhs)
    }
}

impl std::ops::AddAssign<i32> for Value {
    #[inline]
    fn add_assign(&mut self, rhs: i32) {
        self.0 += rhs;
    }
}

impl std::ops::Mul<i32> for Value {
    type Output = Value;

    #[inline]
    fn mul(self, rhs: i32) -> Value {
        Value(self.0 * rhs)
    }
}

impl std::ops::Div<i32> for Value {
    type Output = Value;

    #[inline]
    fn div(self, rhs: i32) -> Value {
        Value(self.0 / rhs)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value(v)
    }
}

impl From<Value> for i32 {
    fn from(v: Value) -> i32 {
        v.0
    }
}

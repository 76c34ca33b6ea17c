use std::fmt;

/// Book side. Decides which edge of a bucket is closed and which edge labels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Bid buckets are `[lo, hi)`, ask buckets are `(lo, hi]`.
    #[inline]
    pub fn closed_on_left(self) -> bool {
        matches!(self, Side::Bid)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

//! Cycle counter.
//!
//! The protocol model is cycle-synchronous, so methods that need time take a
//! [`Cycle`] parameter instead of reading a clock. The harness owns the
//! counter and advances it once per simulation step; production drivers map
//! it onto whatever tick source they have.

/// A point in cycle-synchronous time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cycle(u64);

impl Cycle {
    /// Cycle zero, the reset instant.
    pub const ZERO: Self = Self(0);

    /// Construct from a raw cycle count.
    pub fn new(count: u64) -> Self {
        Self(count)
    }

    /// The cycle `cycles` after this one.
    pub fn advance(self, cycles: u64) -> Self {
        Self(self.0.saturating_add(cycles))
    }

    /// Cycles elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Raw cycle count.
    pub fn count(self) -> u64 {
        self.0
    }
}

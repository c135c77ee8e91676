//! Next-value seam between the transport and the application.
//!
//! When a matching acknowledgment arrives, the sender's next outstanding
//! value is computed from the acknowledged value by an application-supplied
//! function. The transport only plumbs values through this trait; it never
//! interprets them.

/// Computes the next outstanding value from an acknowledged one.
///
/// `&mut self` so that implementations may carry state (e.g. a counter in a
/// test harness).
pub trait ValueTransform {
    /// Next value to transmit, given the value carried by the matching
    /// acknowledgment.
    fn next(&mut self, acked: u32) -> u32;
}

/// Increment-by-one transform, wrapping at `u32::MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Increment;

impl ValueTransform for Increment {
    fn next(&mut self, acked: u32) -> u32 {
        acked.wrapping_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_advances_by_one() {
        let mut t = Increment;
        assert_eq!(t.next(42), 43);
        assert_eq!(t.next(0), 1);
    }

    #[test]
    fn increment_wraps_at_max() {
        let mut t = Increment;
        assert_eq!(t.next(u32::MAX), 0);
    }
}

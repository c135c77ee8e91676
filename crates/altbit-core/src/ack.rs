//! Free-running acknowledgment generator.
//!
//! The receiver side of the link never stops talking: it continuously offers
//! an acknowledgment frame whose alternation bit mirrors an externally
//! driven `expected_bit`. The bit is latched at the start of each frame's
//! offer and held stable for that frame's whole duration: if `expected_bit`
//! changes mid-transfer, the in-flight frame completes with the old bit and
//! the next frame carries the new one. There is no queue and no gap: the
//! moment one frame transfers, the next offer begins.

use altbit_proto::Frame;

/// Single-state (Broadcasting) acknowledgment machine.
///
/// A pure function of `expected_bit`, re-evaluated at every frame boundary.
/// The value field of every acknowledgment is zero.
#[derive(Debug, Clone)]
pub struct AckGenerator {
    expected_bit: bool,
    offered: Frame,
}

impl AckGenerator {
    /// Enter Broadcasting with the given initial bit; the first offered
    /// frame is `(0, initial_bit)`.
    pub fn new(initial_bit: bool) -> Self {
        Self { expected_bit: initial_bit, offered: Frame::encode(0, initial_bit) }
    }

    /// Drive the externally supplied expected-bit state.
    ///
    /// Takes effect at the next frame boundary; the frame currently on offer
    /// is never touched.
    pub fn set_expected_bit(&mut self, bit: bool) {
        self.expected_bit = bit;
    }

    /// The current expected-bit state.
    #[must_use]
    pub fn expected_bit(&self) -> bool {
        self.expected_bit
    }

    /// The frame currently being offered. Always present: Broadcasting has
    /// no idle condition.
    #[must_use]
    pub fn offered(&self) -> &Frame {
        &self.offered
    }

    /// The offered frame transferred; latch `expected_bit` into the next
    /// offer, which begins on the following cycle.
    pub fn frame_sent(&mut self) {
        self.offered = Frame::encode(0, self.expected_bit);
    }
}

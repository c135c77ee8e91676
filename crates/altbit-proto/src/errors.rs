//! Wire-level error taxonomy.
//!
//! Only two things can go wrong on this link below the state machines: a
//! frame of the wrong length, or a boundary marker arriving early. Both are
//! surfaced to the caller and discard only the offending frame; neither
//! disturbs protocol state. Retransmission after timeout is *not* an error
//! and has no variant here.

use thiserror::Error;

use crate::frame::Frame;

/// Errors produced by the frame codec and bus serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    /// A decoded frame was not exactly [`Frame::SIZE`] bytes.
    #[error("malformed frame: expected {expected} bytes, got {actual}")]
    MalformedFrame {
        /// Required frame length ([`Frame::SIZE`]).
        expected: usize,
        /// Length actually observed.
        actual: usize,
    },

    /// A frame-boundary marker arrived before a full frame had accumulated.
    #[error("truncated frame: boundary after {received} of {expected} bytes")]
    TruncatedFrame {
        /// Bytes accumulated when the boundary was seen.
        received: usize,
        /// Bytes required for a complete frame.
        expected: usize,
    },

    /// Requested bus width is zero or wider than a whole frame.
    #[error("unsupported bus width: {width} bytes (must be 1..={max})", max = Frame::SIZE)]
    InvalidWidth {
        /// The rejected width in bytes.
        width: usize,
    },
}

/// Convenience alias for wire-level results.
pub type Result<T> = std::result::Result<T, WireError>;

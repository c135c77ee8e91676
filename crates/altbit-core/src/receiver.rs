//! Application-facing delivery stage.
//!
//! Decodes complete inbound frames and holds the resulting `(value, bit)`
//! pair under the same offer/accept discipline as frames generally: the
//! delivery stays valid until the consumer takes it, and a new frame is
//! refused while one is pending (backpressure, not failure).

use altbit_proto::Frame;

use crate::error::ArqError;

/// A decoded `(value, bit)` pair awaiting consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// The payload value.
    pub value: u32,
    /// The frame's alternation bit.
    pub bit: bool,
}

/// Capacity-1 delivery slot between the link and the application.
#[derive(Debug, Clone, Default)]
pub struct Receiver {
    pending: Option<Delivery>,
}

impl Receiver {
    /// Create an empty delivery stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a new frame can be accepted.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.pending.is_none()
    }

    /// Decode a complete frame and latch its delivery.
    ///
    /// # Errors
    ///
    /// [`ArqError::DeliveryPending`] if the previous delivery has not been
    /// consumed; the caller must hold the frame and retry, which is the
    /// upstream backpressure. [`WireError::MalformedFrame`](altbit_proto::WireError)
    /// if `bytes` is not a whole frame; the frame is discarded and nothing
    /// changes.
    pub fn handle_frame(&mut self, bytes: &[u8]) -> Result<(), ArqError> {
        if self.pending.is_some() {
            return Err(ArqError::DeliveryPending);
        }
        let (value, bit) = Frame::decode(bytes)?;
        self.pending = Some(Delivery { value, bit });
        Ok(())
    }

    /// Observe the pending delivery without consuming it (the validity
    /// signal).
    #[must_use]
    pub fn offered(&self) -> Option<&Delivery> {
        self.pending.as_ref()
    }

    /// Consume the pending delivery.
    pub fn take(&mut self) -> Option<Delivery> {
        self.pending.take()
    }

    /// Discard any pending delivery. Reset path only.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

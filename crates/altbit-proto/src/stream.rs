//! Valid/ready/boundary handshake primitive.
//!
//! Both codec-side interfaces move data as [`Beat`]s through a capacity-1
//! [`StreamSlot`]. A transfer occurs exactly when a pending beat is accepted;
//! until then the producer's offer must stay put (stability contract). The
//! slot enforces the producer half of that contract by refusing a second
//! offer while one is pending. Consumers may poll eagerly or lazily; the
//! handshake makes no distinction, and a beat parked in the slot for an
//! arbitrary number of cycles is ordinary backpressure.

use bytes::Bytes;

/// One bus-width chunk of a frame.
///
/// `last` is the frame-boundary marker: it is set on the final beat of a
/// frame and on no other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beat {
    /// Data carried by this beat.
    pub data: Bytes,
    /// Frame-boundary marker, asserted on the final beat only.
    pub last: bool,
}

impl Beat {
    /// Build a beat over `data`, marking it as the frame boundary if `last`.
    pub fn new(data: Bytes, last: bool) -> Self {
        Self { data, last }
    }
}

/// Capacity-1 producer/consumer handshake.
///
/// The producer side is *offer*: placing a beat in the slot. The consumer
/// side is *accept*: taking it out. Offer and accept on the same cycle is a
/// transfer; a slot that stays occupied models a stalled `ready`.
#[derive(Debug, Default)]
pub struct StreamSlot {
    pending: Option<Beat>,
}

impl StreamSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `beat` to the consumer.
    ///
    /// Returns the beat back if one is already pending: an offered beat may
    /// not be withdrawn or replaced before it transfers.
    pub fn offer(&mut self, beat: Beat) -> Result<(), Beat> {
        if self.pending.is_some() {
            return Err(beat);
        }
        self.pending = Some(beat);
        Ok(())
    }

    /// Whether a beat is currently offered.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Observe the offered beat without consuming it.
    pub fn offered(&self) -> Option<&Beat> {
        self.pending.as_ref()
    }

    /// Accept the offered beat, completing the transfer.
    pub fn accept(&mut self) -> Option<Beat> {
        self.pending.take()
    }

    /// Drop any pending beat. Reset path only.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat(byte: u8, last: bool) -> Beat {
        Beat::new(Bytes::copy_from_slice(&[byte]), last)
    }

    #[test]
    fn transfer_occurs_on_offer_then_accept() {
        let mut slot = StreamSlot::new();
        assert!(!slot.is_pending());
        assert_eq!(slot.accept(), None);

        slot.offer(beat(0xAB, false)).unwrap();
        assert!(slot.is_pending());
        assert_eq!(slot.offered(), Some(&beat(0xAB, false)));

        assert_eq!(slot.accept(), Some(beat(0xAB, false)));
        assert!(!slot.is_pending());
    }

    #[test]
    fn pending_offer_cannot_be_replaced() {
        let mut slot = StreamSlot::new();
        slot.offer(beat(1, false)).unwrap();

        // Second offer is refused and handed back; the original stays stable.
        let refused = slot.offer(beat(2, true)).unwrap_err();
        assert_eq!(refused, beat(2, true));
        assert_eq!(slot.offered(), Some(&beat(1, false)));
    }

    #[test]
    fn beat_survives_arbitrary_stall() {
        let mut slot = StreamSlot::new();
        slot.offer(beat(7, true)).unwrap();

        // Consumer not ready for many cycles; this is backpressure, not loss.
        for _ in 0..1000 {
            assert_eq!(slot.offered(), Some(&beat(7, true)));
        }
        assert_eq!(slot.accept(), Some(beat(7, true)));
    }
}

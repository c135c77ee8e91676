//! Stop-and-wait ARQ sender.
//!
//! This module implements the sender half of the alternating-bit protocol:
//! exactly one outstanding `(value, bit)` pair, timeout-driven retransmission
//! with no retry limit, and advance gated on an acknowledgment whose bit
//! matches the outstanding one.
//!
//! # Architecture: Action-Based State Machine
//!
//! This state machine follows the action pattern:
//! - Methods accept the current cycle as a parameter (no stored clock)
//! - Methods return `Result<Vec<TransmitterAction>, ArqError>`
//! - Driver code executes actions (serialize and send frames)
//!
//! This keeps the timing race (incoming acknowledgment against expiring
//! timer) fully deterministic under test: the driver decides what happens
//! within a cycle, and the machine decides what it means.
//!
//! # State Machine
//!
//! ```text
//!           submit / free-running start
//! ┌──────┐ ─────────────────────────────> ┌──────────────┐
//! │ Idle │                                │ Transmitting │ <───┐
//! └──────┘ <──── reset (only path back)   └──────────────┘     │
//!                                           │ boundary beat    │ timeout,
//!                                           │ accepted         │ or matching
//!                                           ▼                  │ ack (advance)
//!                                         ┌──────────────┐     │
//!                                         │ AwaitingAck  │ ────┘
//!                                         └──────────────┘
//! ```
//!
//! A mismatched bit in AwaitingAck is discarded silently and changes
//! nothing, including the timer. A frame that lands while Transmitting is
//! stashed and evaluated once, on entry to AwaitingAck, so a retransmission
//! already in flight wins the cycle, and the late acknowledgment still
//! advances the machine afterwards without ever double-advancing.

use altbit_proto::Frame;

use crate::{
    clock::Cycle,
    config::ArqConfig,
    error::ArqError,
    transform::ValueTransform,
};

/// Actions returned by the sender state machine.
///
/// The driver (bus port or test harness) executes these: serialize the frame
/// into beats and move it across the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransmitterAction {
    /// Send this frame to the peer.
    SendFrame(Frame),
}

/// Sender state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitterState {
    /// No outstanding packet; the submit interface is ready.
    Idle,
    /// The outstanding packet is crossing the handshake.
    Transmitting,
    /// Packet fully sent; listening for an acknowledgment, timer running.
    AwaitingAck,
}

/// Stop-and-wait sender state machine.
///
/// Holds exactly one outstanding packet. `ready` is asserted only in Idle,
/// which is what enforces the one-outstanding invariant: a submission while
/// busy is refused, never queued or overwritten.
#[derive(Debug, Clone)]
pub struct Transmitter<T> {
    state: TransmitterState,
    config: ArqConfig,
    transform: T,
    outstanding_value: u32,
    outstanding_bit: bool,
    /// Timer deadline while AwaitingAck.
    deadline: Option<Cycle>,
    /// Frame received while Transmitting, held for evaluation on entry to
    /// AwaitingAck. Capacity one, latest wins.
    stashed_ack: Option<(u32, bool)>,
}

impl<T: ValueTransform> Transmitter<T> {
    /// Reset polarity of the alternation bit.
    pub const RESET_BIT: bool = true;

    /// Create a sender in Idle with the reset-time outstanding state
    /// (`value = 0`, `bit = 1`).
    pub fn new(config: ArqConfig, transform: T) -> Self {
        Self {
            state: TransmitterState::Idle,
            config,
            transform,
            outstanding_value: 0,
            outstanding_bit: Self::RESET_BIT,
            deadline: None,
            stashed_ack: None,
        }
    }

    /// Create a sender that starts transmitting `(0, 1)` immediately,
    /// without waiting for a submission.
    ///
    /// This is the hardware reset behavior: the exchange is continuous from
    /// the first cycle, and every subsequent value comes from the transform.
    pub fn free_running(config: ArqConfig, transform: T) -> (Self, Vec<TransmitterAction>) {
        let mut tx = Self::new(config, transform);
        let actions = tx.begin_transmit();
        (tx, actions)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TransmitterState {
        self.state
    }

    /// Whether a new submission would be accepted. True only in Idle.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.state == TransmitterState::Idle
    }

    /// Busy flag: asserted in Transmitting and AwaitingAck.
    #[must_use]
    pub fn busy(&self) -> bool {
        !self.ready()
    }

    /// The outstanding `(value, bit)` pair.
    #[must_use]
    pub fn outstanding(&self) -> (u32, bool) {
        (self.outstanding_value, self.outstanding_bit)
    }

    /// Accept a new `(value, bit)` pair from the application.
    ///
    /// # Errors
    ///
    /// Returns [`ArqError::ProtocolStall`] unless Idle: the refusal leaves
    /// all state untouched and the caller retries later.
    pub fn submit(&mut self, value: u32, bit: bool) -> Result<Vec<TransmitterAction>, ArqError> {
        if self.state != TransmitterState::Idle {
            return Err(ArqError::ProtocolStall { state: self.state });
        }

        self.outstanding_value = value;
        self.outstanding_bit = bit;
        Ok(self.begin_transmit())
    }

    /// The outbound frame's boundary beat was accepted by the peer.
    ///
    /// Transitions Transmitting → AwaitingAck and (re)arms the timer. A
    /// frame stashed during the transmission is evaluated here, once.
    ///
    /// # Errors
    ///
    /// Returns [`ArqError::InvalidState`] if not Transmitting.
    pub fn frame_sent(&mut self, now: Cycle) -> Result<Vec<TransmitterAction>, ArqError> {
        if self.state != TransmitterState::Transmitting {
            return Err(ArqError::InvalidState { state: self.state, operation: "frame_sent" });
        }

        self.state = TransmitterState::AwaitingAck;
        self.deadline = Some(now.advance(self.config.timeout_cycles));

        if let Some((value, bit)) = self.stashed_ack.take() {
            return Ok(self.evaluate_ack(value, bit));
        }
        Ok(Vec::new())
    }

    /// Process a complete inbound frame.
    ///
    /// In AwaitingAck a matching bit advances the machine (next value from
    /// the transform, bit flipped, timer cancelled, new frame transmitted);
    /// a mismatched bit is a stale duplicate and is discarded silently. In
    /// Transmitting the frame is stashed for [`frame_sent`](Self::frame_sent)
    /// to evaluate. In Idle it is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedFrame`](altbit_proto::WireError) for a
    /// frame of the wrong length; no state changes.
    pub fn handle_frame(
        &mut self,
        bytes: &[u8],
        _now: Cycle,
    ) -> Result<Vec<TransmitterAction>, ArqError> {
        let (value, bit) = Frame::decode(bytes)?;

        match self.state {
            TransmitterState::AwaitingAck => Ok(self.evaluate_ack(value, bit)),
            TransmitterState::Transmitting => {
                self.stashed_ack = Some((value, bit));
                Ok(Vec::new())
            },
            TransmitterState::Idle => Ok(Vec::new()),
        }
    }

    /// Advance the timer race by one observation.
    ///
    /// Call once per cycle. In AwaitingAck with the deadline reached, the
    /// outstanding frame is retransmitted byte-identically and the machine
    /// re-enters Transmitting; the timer rearms on the next
    /// [`frame_sent`](Self::frame_sent). Retry is unbounded: this is the
    /// designed recovery path, not a failure.
    pub fn tick(&mut self, now: Cycle) -> Vec<TransmitterAction> {
        if self.state != TransmitterState::AwaitingAck {
            return Vec::new();
        }
        let Some(deadline) = self.deadline else {
            return Vec::new();
        };
        if now < deadline {
            return Vec::new();
        }

        self.deadline = None;
        self.begin_transmit()
    }

    /// Force Idle, discarding the outstanding packet, the timer, and any
    /// stashed frame. The only way to abort an outstanding send.
    pub fn reset(&mut self) {
        self.state = TransmitterState::Idle;
        self.outstanding_value = 0;
        self.outstanding_bit = Self::RESET_BIT;
        self.deadline = None;
        self.stashed_ack = None;
    }

    fn evaluate_ack(&mut self, value: u32, bit: bool) -> Vec<TransmitterAction> {
        if bit != self.outstanding_bit {
            // Stale or duplicate acknowledgment. Timer keeps running.
            return Vec::new();
        }

        self.deadline = None;
        self.outstanding_value = self.transform.next(value);
        self.outstanding_bit = !self.outstanding_bit;
        self.begin_transmit()
    }

    fn begin_transmit(&mut self) -> Vec<TransmitterAction> {
        self.state = TransmitterState::Transmitting;
        vec![TransmitterAction::SendFrame(Frame::encode(
            self.outstanding_value,
            self.outstanding_bit,
        ))]
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::transform::Increment;

    use super::*;

    fn config(timeout_cycles: u64) -> ArqConfig {
        ArqConfig { timeout_cycles }
    }

    fn sent_frame(actions: &[TransmitterAction]) -> &Frame {
        match actions {
            [TransmitterAction::SendFrame(frame)] => frame,
            other => panic!("expected a single SendFrame, got {other:?}"),
        }
    }

    #[test]
    fn idle_after_reset() {
        let tx = Transmitter::new(config(16), Increment);

        assert_eq!(tx.state(), TransmitterState::Idle);
        assert!(tx.ready());
        assert!(!tx.busy());
        assert_eq!(tx.outstanding(), (0, true));
    }

    #[test]
    fn submit_transmits_and_refuses_seconds() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(16), Increment);

        let actions = tx.submit(42, true).unwrap();
        let frame = sent_frame(&actions);
        assert_eq!((frame.value(), frame.bit()), (42, true));
        assert_eq!(frame.as_slice().len(), 64);
        assert!(frame.as_slice()[4..63].iter().all(|&b| b == 0));

        // Busy on acceptance; a second submission stalls, never queues.
        assert!(tx.busy());
        assert_eq!(
            tx.submit(7, false),
            Err(ArqError::ProtocolStall { state: TransmitterState::Transmitting })
        );

        tx.frame_sent(t0).unwrap();
        assert_eq!(
            tx.submit(7, false),
            Err(ArqError::ProtocolStall { state: TransmitterState::AwaitingAck })
        );
        assert!(tx.busy());
    }

    #[test]
    fn timeout_retransmits_byte_identical() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(100), Increment);

        let first = *sent_frame(&tx.submit(0xAABB_CCDD, true).unwrap());
        tx.frame_sent(t0).unwrap();

        // Before the deadline, nothing happens.
        assert!(tx.tick(t0.advance(99)).is_empty());
        assert_eq!(tx.state(), TransmitterState::AwaitingAck);

        let retrans = tx.tick(t0.advance(100));
        assert_eq!(sent_frame(&retrans).as_slice(), first.as_slice());
        assert_eq!(tx.state(), TransmitterState::Transmitting);
    }

    #[test]
    fn retry_is_unbounded_and_idempotent() {
        let mut now = Cycle::ZERO;
        let mut tx = Transmitter::new(config(10), Increment);

        let first = *sent_frame(&tx.submit(5, true).unwrap());
        tx.frame_sent(now).unwrap();

        for _ in 0..50 {
            now = now.advance(10);
            let actions = tx.tick(now);
            assert_eq!(sent_frame(&actions).as_slice(), first.as_slice());
            tx.frame_sent(now).unwrap();
        }
    }

    #[test]
    fn matching_ack_advances_and_flips_bit() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(16), Increment);

        tx.submit(10, true).unwrap();
        tx.frame_sent(t0).unwrap();

        let ack = Frame::encode(10, true);
        let actions = tx.handle_frame(ack.as_slice(), t0.advance(3)).unwrap();

        let next = sent_frame(&actions);
        assert_eq!((next.value(), next.bit()), (11, false));
        assert_eq!(tx.state(), TransmitterState::Transmitting);
        assert_eq!(tx.outstanding(), (11, false));
    }

    #[test]
    fn mismatched_bit_never_advances() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(100), Increment);

        tx.submit(10, true).unwrap();
        tx.frame_sent(t0).unwrap();

        let stale = Frame::encode(99, false);
        let actions = tx.handle_frame(stale.as_slice(), t0.advance(1)).unwrap();
        assert!(actions.is_empty());
        assert_eq!(tx.state(), TransmitterState::AwaitingAck);
        assert_eq!(tx.outstanding(), (10, true));

        // The discard leaves the timer running: it still fires on schedule.
        let retrans = tx.tick(t0.advance(100));
        assert_eq!(sent_frame(&retrans).as_slice(), Frame::encode(10, true).as_slice());
    }

    #[test]
    fn free_running_starts_with_zero_one() {
        let (tx, actions) = Transmitter::free_running(config(16), Increment);

        let frame = sent_frame(&actions);
        assert_eq!((frame.value(), frame.bit()), (0, true));
        assert_eq!(tx.state(), TransmitterState::Transmitting);
    }

    #[test]
    fn immediate_ack_after_reset_advances() {
        // Reset, then a frame (0xAABBCCDD, 1) against outstanding (0, 1):
        // the sender advances to (f(0xAABBCCDD), 0) and transmits it.
        let t0 = Cycle::ZERO;
        let (mut tx, _) = Transmitter::free_running(config(16), Increment);
        tx.frame_sent(t0).unwrap();

        let ack = Frame::encode(0xAABB_CCDD, true);
        let actions = tx.handle_frame(ack.as_slice(), t0).unwrap();
        let next = sent_frame(&actions);
        assert_eq!((next.value(), next.bit()), (0xAABB_CCDE, false));

        // An identical second frame before the advance completes is ignored:
        // the outstanding bit has already flipped.
        let dup = tx.handle_frame(ack.as_slice(), t0.advance(1)).unwrap();
        assert!(dup.is_empty());
        tx.frame_sent(t0.advance(2)).unwrap();
        assert_eq!(tx.outstanding(), (0xAABB_CCDE, false));
    }

    #[test]
    fn late_ack_during_retransmit_still_advances_once() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(10), Increment);

        tx.submit(20, true).unwrap();
        tx.frame_sent(t0).unwrap();

        // Timer fires; the retransmission in flight wins the cycle.
        let retrans = tx.tick(t0.advance(10));
        assert_eq!(sent_frame(&retrans).as_slice(), Frame::encode(20, true).as_slice());

        // The late matching frame lands in the same cycle. It is stashed,
        // not evaluated, while the retransmit crosses the handshake.
        let ack = Frame::encode(20, true);
        let stash = tx.handle_frame(ack.as_slice(), t0.advance(10)).unwrap();
        assert!(stash.is_empty());
        assert_eq!(tx.outstanding(), (20, true));

        // On entry to the next AwaitingAck window the stashed frame is
        // evaluated against the unchanged bit and advances exactly once.
        let actions = tx.frame_sent(t0.advance(12)).unwrap();
        let next = sent_frame(&actions);
        assert_eq!((next.value(), next.bit()), (21, false));
    }

    #[test]
    fn malformed_frame_is_surfaced_without_state_change() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(16), Increment);

        tx.submit(1, true).unwrap();
        tx.frame_sent(t0).unwrap();

        let err = tx.handle_frame(&[0u8; 12], t0).unwrap_err();
        assert!(matches!(err, ArqError::Wire(_)));
        assert_eq!(tx.state(), TransmitterState::AwaitingAck);
        assert_eq!(tx.outstanding(), (1, true));
    }

    #[test]
    fn frame_sent_outside_transmitting_is_invalid() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(16), Increment);

        assert_eq!(
            tx.frame_sent(t0),
            Err(ArqError::InvalidState {
                state: TransmitterState::Idle,
                operation: "frame_sent"
            })
        );
    }

    #[test]
    fn reset_discards_outstanding_and_timer() {
        let t0 = Cycle::ZERO;
        let mut tx = Transmitter::new(config(10), Increment);

        tx.submit(33, false).unwrap();
        tx.frame_sent(t0).unwrap();

        tx.reset();
        assert!(tx.ready());
        assert_eq!(tx.outstanding(), (0, true));
        assert!(tx.tick(t0.advance(1000)).is_empty());
    }

    proptest! {
        /// Whatever frames arrive, the machine advances exactly when the bit
        /// matches the outstanding one, and the bit strictly alternates.
        #[test]
        fn prop_advances_only_on_matching_bit(
            start: u32,
            acks in prop::collection::vec((any::<u32>(), any::<bool>()), 1..64)
        ) {
            let mut now = Cycle::ZERO;
            let mut tx = Transmitter::new(config(8), Increment);
            tx.submit(start, true).unwrap();
            tx.frame_sent(now).unwrap();

            let mut expected_bit = true;
            for (value, bit) in acks {
                now = now.advance(1);
                let frame = Frame::encode(value, bit);
                let actions = tx.handle_frame(frame.as_slice(), now).unwrap();

                if bit == expected_bit {
                    expected_bit = !expected_bit;
                    let next = sent_frame(&actions);
                    prop_assert_eq!(
                        (next.value(), next.bit()),
                        (value.wrapping_add(1), expected_bit)
                    );
                    tx.frame_sent(now).unwrap();
                } else {
                    prop_assert!(actions.is_empty());
                }
                prop_assert_eq!(tx.outstanding().1, expected_bit);
            }
        }

        /// However many mismatched-bit frames land between timeouts, every
        /// retransmission is byte-identical to the first transmission.
        #[test]
        fn prop_retransmit_is_byte_identical_under_stale_acks(
            value: u32,
            stale in prop::collection::vec(any::<u32>(), 1..32)
        ) {
            let mut now = Cycle::ZERO;
            let mut tx = Transmitter::new(config(4), Increment);
            let first = *sent_frame(&tx.submit(value, true).unwrap());
            tx.frame_sent(now).unwrap();

            for stale_value in stale {
                let frame = Frame::encode(stale_value, false);
                prop_assert!(tx.handle_frame(frame.as_slice(), now).unwrap().is_empty());
                prop_assert_eq!(tx.outstanding(), (value, true));

                now = now.advance(4);
                let actions = tx.tick(now);
                prop_assert_eq!(sent_frame(&actions).as_slice(), first.as_slice());
                tx.frame_sent(now).unwrap();
            }
        }
    }
}

//! Cycle-steppable bus ports around the core state machines.
//!
//! The core machines work at frame granularity; these endpoints do the
//! beat-level plumbing: pumping serializers into [`StreamSlot`]s, collecting
//! inbound beats, and reporting frame boundaries back to the machines. One
//! `step` call is one cycle.

use altbit_core::{
    AckGenerator, ArqConfig, ArqError, Cycle, Delivery, Receiver, Transmitter, TransmitterAction,
    ValueTransform,
};
use altbit_proto::{Frame, FrameCollector, FrameSerializer, StreamSlot};

/// Pumps a serializer into `slot`, tracking when the boundary beat has been
/// accepted by the far side.
#[derive(Debug, Default)]
struct TxPump {
    serializer: Option<FrameSerializer>,
    boundary_in_flight: bool,
}

impl TxPump {
    fn load(&mut self, frame: &Frame, width: usize) -> Result<(), ArqError> {
        self.serializer = Some(FrameSerializer::new(frame, width)?);
        Ok(())
    }

    fn idle(&self) -> bool {
        self.serializer.is_none() && !self.boundary_in_flight
    }

    /// Returns true exactly once per frame: on the cycle the boundary beat
    /// is observed to have been consumed.
    fn pump(&mut self, slot: &mut StreamSlot) -> bool {
        let boundary_done = self.boundary_in_flight && !slot.is_pending();
        if boundary_done {
            self.boundary_in_flight = false;
        }

        if let Some(serializer) = self.serializer.as_mut() {
            if !slot.is_pending() && !self.boundary_in_flight {
                if let Some(beat) = serializer.peek() {
                    let last = beat.last;
                    if slot.offer(beat).is_ok() {
                        serializer.advance();
                        if last {
                            self.boundary_in_flight = true;
                            self.serializer = None;
                        }
                    }
                }
            }
        }

        boundary_done
    }
}

/// Sender-side port: the ARQ machine plus its serializer and ack collector.
#[derive(Debug)]
pub struct SenderEndpoint<T> {
    arq: Transmitter<T>,
    tx: TxPump,
    rx: FrameCollector,
    width: usize,
    frames_started: u64,
}

impl<T: ValueTransform> SenderEndpoint<T> {
    /// Create a free-running sender: the first packet `(0, 1)` starts
    /// crossing the bus immediately, as at hardware reset.
    pub fn new(config: ArqConfig, transform: T, width: usize) -> Result<Self, ArqError> {
        let (arq, actions) = Transmitter::free_running(config, transform);
        let mut endpoint = Self {
            arq,
            tx: TxPump::default(),
            rx: FrameCollector::new(width)?,
            width,
            frames_started: 0,
        };
        endpoint.execute(actions)?;
        Ok(endpoint)
    }

    /// The underlying state machine, for oracle assertions.
    pub fn arq(&self) -> &Transmitter<T> {
        &self.arq
    }

    /// Number of frame transmissions started, retransmissions included.
    pub fn frames_started(&self) -> u64 {
        self.frames_started
    }

    /// One cycle: timer first (a timer-triggered retransmit takes priority
    /// over a frame landing in the same cycle), then beat plumbing in both
    /// directions.
    pub fn step(
        &mut self,
        now: Cycle,
        outbound: &mut StreamSlot,
        inbound: &mut StreamSlot,
    ) -> Result<(), ArqError> {
        let actions = self.arq.tick(now);
        self.execute(actions)?;

        if self.tx.pump(outbound) {
            let actions = self.arq.frame_sent(now)?;
            self.execute(actions)?;
            // An advance may queue the next frame within the same cycle.
            self.tx.pump(outbound);
        }

        if let Some(beat) = inbound.accept() {
            if let Some(bytes) = self.rx.push(&beat)? {
                let actions = self.arq.handle_frame(&bytes, now)?;
                self.execute(actions)?;
            }
        }

        Ok(())
    }

    fn execute(&mut self, actions: Vec<TransmitterAction>) -> Result<(), ArqError> {
        for action in actions {
            match action {
                TransmitterAction::SendFrame(frame) => {
                    self.frames_started += 1;
                    self.tx.load(&frame, self.width)?;
                },
            }
        }
        Ok(())
    }
}

/// Responder-side port: delivery stage plus the free-running ack generator.
///
/// The acceptance policy driving `expected_bit` lives here, outside the
/// core: a frame whose bit differs from the last accepted one is new data
/// (deliver it, adopt its bit); a frame repeating that bit is a duplicate
/// (drop the delivery, keep acknowledging). The initial expected bit is the
/// opposite of the sender's reset polarity, so reset-time acknowledgments
/// cannot be mistaken for matches.
#[derive(Debug)]
pub struct ResponderEndpoint {
    ack: AckGenerator,
    delivery: Receiver,
    tx: TxPump,
    rx: FrameCollector,
    width: usize,
    last_accepted_bit: Option<bool>,
    delivered: Vec<Delivery>,
    duplicates_dropped: u64,
}

impl ResponderEndpoint {
    /// Create a responder acknowledging on a bus of `width` bytes.
    pub fn new(width: usize) -> Result<Self, ArqError> {
        Ok(Self {
            ack: AckGenerator::new(false),
            delivery: Receiver::new(),
            tx: TxPump::default(),
            rx: FrameCollector::new(width)?,
            width,
            last_accepted_bit: None,
            delivered: Vec::new(),
            duplicates_dropped: 0,
        })
    }

    /// Every delivery taken by the (eager) application consumer, in order.
    pub fn delivered(&self) -> &[Delivery] {
        &self.delivered
    }

    /// Duplicate frames suppressed by the acceptance policy.
    pub fn duplicates_dropped(&self) -> u64 {
        self.duplicates_dropped
    }

    /// One cycle: drain the delivery slot, absorb inbound beats, and keep
    /// the acknowledgment stream flowing.
    pub fn step(
        &mut self,
        _now: Cycle,
        outbound: &mut StreamSlot,
        inbound: &mut StreamSlot,
    ) -> Result<(), ArqError> {
        // Eager application: consume the pending delivery every cycle.
        if let Some(delivery) = self.delivery.take() {
            self.delivered.push(delivery);
        }

        if self.delivery.ready() {
            if let Some(beat) = inbound.accept() {
                if let Some(bytes) = self.rx.push(&beat)? {
                    self.accept_frame(&bytes)?;
                }
            }
        }

        if self.tx.pump(outbound) {
            self.ack.frame_sent();
        }
        if self.tx.idle() {
            // Broadcasting never pauses: the next offer begins at once.
            self.tx.load(self.ack.offered(), self.width)?;
            self.tx.pump(outbound);
        }

        Ok(())
    }

    fn accept_frame(&mut self, bytes: &[u8]) -> Result<(), ArqError> {
        let frame = Frame::parse(bytes).map_err(ArqError::from)?;
        if self.last_accepted_bit == Some(frame.bit()) {
            // Retransmission of the packet we already accepted. The ack
            // stream keeps mirroring its bit; the delivery is suppressed.
            self.duplicates_dropped += 1;
            return Ok(());
        }

        self.delivery.handle_frame(bytes)?;
        self.last_accepted_bit = Some(frame.bit());
        self.ack.set_expected_bit(frame.bit());
        Ok(())
    }
}

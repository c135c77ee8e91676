//! World state for cycle-stepped simulation.
//!
//! Wires a free-running sender and an acknowledging responder over two
//! [`Link`]s (data one way, acknowledgments the other) and advances the
//! whole system one cycle at a time. The world tracks per-direction frame
//! counts and exposes the responder's delivery log for oracle assertions.

use altbit_core::{ArqConfig, ArqError, Cycle, Delivery, Transmitter, ValueTransform};
use altbit_proto::StreamSlot;
use tracing::debug;

use crate::{
    endpoint::{ResponderEndpoint, SenderEndpoint},
    link::{FaultPlan, Link},
};

/// Construction-time parameters for a [`World`].
#[derive(Debug, Clone, Copy)]
pub struct WorldConfig {
    /// Bus width in bytes, for every hop.
    pub width: usize,
    /// Sender retry timeout in cycles.
    pub timeout_cycles: u64,
    /// Fault schedule for the data direction (sender → responder).
    pub data_faults: FaultPlan,
    /// Fault schedule for the acknowledgment direction.
    pub ack_faults: FaultPlan,
    /// Seed for all fault randomness.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            timeout_cycles: 256,
            data_faults: FaultPlan::default(),
            ack_faults: FaultPlan::default(),
            seed: 0,
        }
    }
}

/// A sender/responder pair joined by two lossy links.
#[derive(Debug)]
pub struct World<T> {
    now: Cycle,
    sender: SenderEndpoint<T>,
    responder: ResponderEndpoint,
    data_link: Link,
    ack_link: Link,
    // Wire registers between the actors and the links.
    sender_out: StreamSlot,
    responder_in: StreamSlot,
    responder_out: StreamSlot,
    sender_in: StreamSlot,
}

impl<T: ValueTransform> World<T> {
    /// Build a world; the sender starts transmitting `(0, 1)` at cycle zero.
    pub fn new(config: WorldConfig, transform: T) -> Result<Self, ArqError> {
        Ok(Self {
            now: Cycle::ZERO,
            sender: SenderEndpoint::new(
                ArqConfig { timeout_cycles: config.timeout_cycles },
                transform,
                config.width,
            )?,
            responder: ResponderEndpoint::new(config.width)?,
            data_link: Link::new("data", config.width, config.data_faults, config.seed)?,
            ack_link: Link::new("ack", config.width, config.ack_faults, config.seed ^ 1)?,
            sender_out: StreamSlot::new(),
            responder_in: StreamSlot::new(),
            responder_out: StreamSlot::new(),
            sender_in: StreamSlot::new(),
        })
    }

    /// Advance the whole system by one cycle.
    pub fn step(&mut self) -> Result<(), ArqError> {
        let now = self.now;
        self.sender.step(now, &mut self.sender_out, &mut self.sender_in)?;
        self.data_link.step(now, &mut self.sender_out, &mut self.responder_in)?;
        self.responder.step(now, &mut self.responder_out, &mut self.responder_in)?;
        self.ack_link.step(now, &mut self.responder_out, &mut self.sender_in)?;
        self.now = now.advance(1);
        Ok(())
    }

    /// Run `cycles` steps.
    pub fn run(&mut self, cycles: u64) -> Result<(), ArqError> {
        for _ in 0..cycles {
            self.step()?;
        }
        debug!(
            cycle = self.now.count(),
            delivered = self.responder.delivered().len(),
            data_carried = self.data_link.frames_carried(),
            data_dropped = self.data_link.frames_dropped(),
            ack_carried = self.ack_link.frames_carried(),
            ack_dropped = self.ack_link.frames_dropped(),
            "run complete"
        );
        Ok(())
    }

    /// Current cycle.
    pub fn now(&self) -> Cycle {
        self.now
    }

    /// Deliveries taken by the responder's application, in order.
    pub fn delivered(&self) -> &[Delivery] {
        self.responder.delivered()
    }

    /// The sender's ARQ machine, for oracle assertions.
    pub fn sender(&self) -> &Transmitter<T> {
        self.sender.arq()
    }

    /// Frame transmissions the sender started, retransmissions included.
    pub fn frames_started(&self) -> u64 {
        self.sender.frames_started()
    }

    /// Duplicate frames the responder suppressed.
    pub fn duplicates_dropped(&self) -> u64 {
        self.responder.duplicates_dropped()
    }

    /// The data-direction link, for fault metrics.
    pub fn data_link(&self) -> &Link {
        &self.data_link
    }

    /// The acknowledgment-direction link, for fault metrics.
    pub fn ack_link(&self) -> &Link {
        &self.ack_link
    }

    /// Oracle: deliveries carry strictly alternating bits, starting at the
    /// sender's reset polarity.
    pub fn bits_alternate(&self) -> bool {
        self.responder
            .delivered()
            .iter()
            .enumerate()
            .all(|(i, d)| d.bit == (i % 2 == 0))
    }
}

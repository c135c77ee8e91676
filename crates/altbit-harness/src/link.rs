//! Frame-granularity erasure channel with fault injection.
//!
//! The transport assumes frames arrive intact or not at all, so loss is
//! injected per frame, never per beat: the link collects inbound beats into
//! whole frames, flips a seeded coin for each, and re-serializes survivors
//! toward the consumer after a fixed latency. The staged in-flight frame
//! lives in a [`FrameStore`], one frame deep, so a second frame completing
//! ingress while one is staged backpressures the producer instead of being
//! queued.

use altbit_core::{Cycle, FrameStore};
use altbit_proto::{Frame, FrameCollector, FrameSerializer, StreamSlot, WireError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Fault schedule for one link direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultPlan {
    /// Per-frame drop probability in `[0.0, 1.0]`. Out-of-range values are
    /// clamped at link construction.
    pub loss_rate: f64,
    /// Cycles between frame completion at ingress and the first egress beat.
    pub latency_cycles: u64,
    /// Extra cycles the link withholds readiness between egress beats.
    pub stall_cycles: u64,
}

/// One direction of the wire.
#[derive(Debug)]
pub struct Link {
    label: &'static str,
    width: usize,
    ingress: FrameCollector,
    store: FrameStore,
    staged_at: Option<Cycle>,
    egress: Option<FrameSerializer>,
    stall_left: u64,
    faults: FaultPlan,
    rng: ChaCha8Rng,
    frames_carried: u64,
    frames_dropped: u64,
}

impl Link {
    /// Create a link of `width`-byte beats with the given fault plan.
    ///
    /// `label` names the direction in trace output; `seed` makes the loss
    /// pattern reproducible. A `loss_rate` outside `[0.0, 1.0]` (or NaN) is
    /// brought back into range: the coin flip requires a probability.
    pub fn new(
        label: &'static str,
        width: usize,
        mut faults: FaultPlan,
        seed: u64,
    ) -> Result<Self, WireError> {
        if faults.loss_rate.is_nan() {
            faults.loss_rate = 0.0;
        }
        faults.loss_rate = faults.loss_rate.clamp(0.0, 1.0);
        Ok(Self {
            label,
            width,
            ingress: FrameCollector::new(width)?,
            store: FrameStore::new(),
            staged_at: None,
            egress: None,
            stall_left: 0,
            faults,
            rng: ChaCha8Rng::seed_from_u64(seed),
            frames_carried: 0,
            frames_dropped: 0,
        })
    }

    /// Frames delivered to the consumer side.
    pub fn frames_carried(&self) -> u64 {
        self.frames_carried
    }

    /// Frames erased by fault injection.
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// One cycle: absorb a beat from `upstream`, move a due staged frame to
    /// egress, and offer the next egress beat to `downstream`.
    pub fn step(
        &mut self,
        now: Cycle,
        upstream: &mut StreamSlot,
        downstream: &mut StreamSlot,
    ) -> Result<(), WireError> {
        // Ingress. While a frame is staged the link is not ready: the beat
        // stays in the producer's slot (ordinary backpressure).
        if self.staged_at.is_none() {
            if let Some(beat) = upstream.accept() {
                if let Some(bytes) = self.ingress.push(&beat)? {
                    self.absorb_frame(&bytes, now)?;
                }
            }
        }

        // Staged frame becomes transmittable once its latency has elapsed.
        if self.egress.is_none() {
            if let Some(staged) = self.staged_at {
                if now.since(staged) >= self.faults.latency_cycles {
                    let bytes = self.store.read_frame();
                    let frame = Frame::parse(&bytes)?;
                    self.egress = Some(FrameSerializer::new(&frame, self.width)?);
                    self.staged_at = None;
                }
            }
        }

        // Egress pacing.
        if self.stall_left > 0 {
            self.stall_left -= 1;
            return Ok(());
        }
        if let Some(serializer) = self.egress.as_mut() {
            if !downstream.is_pending() {
                if let Some(beat) = serializer.peek() {
                    let last = beat.last;
                    if downstream.offer(beat).is_ok() {
                        serializer.advance();
                        self.stall_left = self.faults.stall_cycles;
                        if last {
                            self.egress = None;
                            self.frames_carried += 1;
                            debug!(link = self.label, cycle = now.count(), "frame delivered");
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn absorb_frame(&mut self, bytes: &[u8], now: Cycle) -> Result<(), WireError> {
        let frame = Frame::parse(bytes)?;
        if self.faults.loss_rate > 0.0 && self.rng.gen_bool(self.faults.loss_rate) {
            self.frames_dropped += 1;
            debug!(link = self.label, cycle = now.count(), "frame erased");
            return Ok(());
        }

        self.store.write_frame(&frame);
        self.staged_at = Some(now);
        Ok(())
    }
}

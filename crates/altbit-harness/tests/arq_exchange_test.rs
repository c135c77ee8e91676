//! End-to-end exchange tests over clean links.
//!
//! These tests run the full sender/responder pair through the simulated
//! wire with no faults configured and check the core delivery guarantees:
//! - every packet arrives exactly once, in submission order
//! - the alternation bit flips on every accepted packet
//! - no retransmissions or duplicate suppression fire on a clean wire

use altbit_core::ValueTransform;
use altbit_harness::{World, WorldConfig};

/// Transform that ignores the acknowledged value and counts locally, so
/// the delivered stream is `0, 1, 2, ..` and ordering is checkable.
struct Counting {
    next: u32,
}

impl Counting {
    fn new() -> Self {
        Self { next: 0 }
    }
}

impl ValueTransform for Counting {
    fn next(&mut self, _acked: u32) -> u32 {
        self.next += 1;
        self.next
    }
}

fn run_clean(width: usize, cycles: u64) -> World<Counting> {
    let config = WorldConfig { width, ..WorldConfig::default() };
    let mut world = World::new(config, Counting::new()).expect("valid config");
    world.run(cycles).expect("clean run");
    world
}

#[test]
fn delivers_in_order_exactly_once() {
    let world = run_clean(8, 2000);

    let delivered = world.delivered();
    assert!(delivered.len() >= 10, "only {} deliveries in 2000 cycles", delivered.len());
    for (i, delivery) in delivered.iter().enumerate() {
        assert_eq!(delivery.value, i as u32, "out of order at index {i}");
    }
}

#[test]
fn alternation_bit_flips_per_packet() {
    let world = run_clean(8, 2000);

    assert!(world.bits_alternate());
    // Reset polarity first.
    assert!(world.delivered()[0].bit);
}

#[test]
fn clean_wire_needs_no_retransmissions() {
    let world = run_clean(8, 2000);

    // One transmission per delivery, plus at most one frame still in flight.
    let delivered = world.delivered().len() as u64;
    assert!(
        world.frames_started() <= delivered + 1,
        "{} transmissions for {} deliveries",
        world.frames_started(),
        delivered
    );
    assert_eq!(world.duplicates_dropped(), 0);
    assert_eq!(world.data_link().frames_dropped(), 0);
    assert_eq!(world.ack_link().frames_dropped(), 0);
}

#[test]
fn narrow_and_wide_buses_agree() {
    // Widths that divide 64 evenly and ones that leave a short tail beat.
    for width in [1, 4, 7, 8, 16, 33, 64] {
        let world = run_clean(width, 4000);

        let delivered = world.delivered();
        assert!(delivered.len() >= 4, "width {width}: only {} deliveries", delivered.len());
        for (i, delivery) in delivered.iter().enumerate() {
            assert_eq!(delivery.value, i as u32, "width {width}: out of order at {i}");
        }
        assert!(world.bits_alternate(), "width {width}: bit sequence broken");
    }
}

#[test]
fn single_byte_bus_still_progresses() {
    // 64 beats per frame per hop. The round trip can exceed the retry
    // timeout, which forces spurious retransmissions; delivery order must
    // survive them.
    let config = WorldConfig { width: 1, timeout_cycles: 96, ..WorldConfig::default() };
    let mut world = World::new(config, Counting::new()).expect("valid config");
    world.run(20_000).expect("clean run");

    let delivered = world.delivered();
    assert!(delivered.len() >= 5);
    for (i, delivery) in delivered.iter().enumerate() {
        assert_eq!(delivery.value, i as u32);
    }
}

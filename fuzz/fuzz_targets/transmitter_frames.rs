//! Fuzz the ARQ machine with arbitrary inbound frames.
//!
//! Whatever mixture of garbage, duplicate, and well-formed acknowledgment
//! frames arrives, the machine must never panic and must keep at most one
//! packet outstanding.

#![no_main]

use altbit_core::{ArqConfig, Cycle, Increment, Transmitter, TransmitterState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (mut arq, _) = Transmitter::free_running(ArqConfig::default(), Increment);
    let mut now = Cycle::ZERO;

    for chunk in data.chunks(65) {
        now = now.advance(u64::from(chunk.first().copied().unwrap_or(1)));

        let _ = arq.tick(now);
        if arq.state() == TransmitterState::Transmitting {
            let _ = arq.frame_sent(now);
        }
        let _ = arq.handle_frame(&chunk[1..], now);

        assert_eq!(arq.ready(), arq.state() == TransmitterState::Idle);
    }
});

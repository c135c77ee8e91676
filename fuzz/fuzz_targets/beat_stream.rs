//! Fuzz the beat collector with arbitrary beat streams.
//!
//! The fuzzer drives `FrameCollector` with arbitrary chunk sizes and
//! boundary placements. The collector must never panic: truncated and
//! overrunning frames come back as errors, and the buffer resets cleanly
//! after every boundary or error.

#![no_main]

use altbit_proto::{Beat, FrameCollector};
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the width; the rest is chopped into beats with a
    // boundary wherever the chunk value's low bit is set.
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let width = usize::from(first % 64) + 1;

    let Ok(mut collector) = FrameCollector::new(width) else {
        return;
    };

    for chunk in rest.chunks(width) {
        let last = chunk.first().is_some_and(|b| b & 1 == 1);
        let beat = Beat::new(Bytes::copy_from_slice(chunk), last);
        let _ = collector.push(&beat);
    }
});

//! Fuzz the frame decoder with arbitrary byte slices.
//!
//! `decode` must either return a value/bit pair or a structured error;
//! it must never panic, and a successful decode must re-encode to the
//! same canonical frame.

#![no_main]

use altbit_proto::Frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((value, bit)) = Frame::decode(data) {
        // A decodable input is exactly one frame long.
        assert_eq!(data.len(), Frame::SIZE);

        let frame = Frame::encode(value, bit);
        assert_eq!(frame.value(), value);
        assert_eq!(frame.bit(), bit);
    }
});

//! Fixed 64-byte frame codec.
//!
//! Layout (verified at compile time by `zerocopy`):
//!
//! ```text
//! byte  0..4    value, big-endian u32 (opaque to the transport)
//! byte  4..63   padding, zero-filled on transmit, ignored on receipt
//! byte 63       flag byte; only bit 0 is significant (alternation bit)
//! ```
//!
//! A frame of any other length is a protocol violation. Padding is never
//! validated: producers zero-fill it, but consumers accept whatever arrives
//! there. Likewise only bit 0 of the flag byte means anything.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, byteorder::big_endian::U32,
};

use crate::errors::WireError;

/// Number of padding bytes between the value and the flag byte.
const PADDING_SIZE: usize = 59;

/// One alternating-bit frame, exactly 64 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable,
    Unaligned)]
#[repr(C)]
pub struct Frame {
    value: U32,
    padding: [u8; PADDING_SIZE],
    flag: u8,
}

impl Frame {
    /// Total frame length on the wire, in bytes.
    pub const SIZE: usize = 64;

    /// Width of the value field, in bytes.
    pub const VALUE_SIZE: usize = 4;

    /// Build a frame carrying `value` and the alternation `bit`.
    ///
    /// Padding is zero-filled; the flag byte is `0x00` or `0x01`. Always
    /// succeeds.
    pub fn encode(value: u32, bit: bool) -> Self {
        Self { value: U32::new(value), padding: [0; PADDING_SIZE], flag: u8::from(bit) }
    }

    /// Decode `bytes` into a `(value, bit)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedFrame`] unless `bytes` is exactly
    /// [`Frame::SIZE`] bytes long.
    pub fn decode(bytes: &[u8]) -> Result<(u32, bool), WireError> {
        let frame = Self::parse(bytes)?;
        Ok((frame.value(), frame.bit()))
    }

    /// Reinterpret `bytes` as a frame, enforcing the length invariant.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedFrame`] unless `bytes` is exactly
    /// [`Frame::SIZE`] bytes long.
    pub fn parse(bytes: &[u8]) -> Result<Self, WireError> {
        Self::read_from_bytes(bytes)
            .map_err(|_| WireError::MalformedFrame { expected: Self::SIZE, actual: bytes.len() })
    }

    /// The payload value, decoded from big-endian.
    pub fn value(&self) -> u32 {
        self.value.get()
    }

    /// The alternation bit (bit 0 of the flag byte).
    pub fn bit(&self) -> bool {
        self.flag & 0x01 == 0x01
    }

    /// Wire representation of this frame.
    pub fn as_slice(&self) -> &[u8] {
        self.as_bytes()
    }
}

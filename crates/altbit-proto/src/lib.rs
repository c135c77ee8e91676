//! Wire format for the altbit link protocol.
//!
//! The unit of transfer is a fixed 64-byte frame: a big-endian 32-bit value,
//! reserved padding, and a single alternation bit in the low bit of the final
//! byte. Frames cross the bus as a sequence of fixed-width beats under a
//! valid/ready handshake, with a boundary marker on the final beat.
//!
//! The fixed layout is deliberate: endpoints route on the alternation bit
//! alone, without inspecting the payload, and a receiver can tell a complete
//! frame from a truncated one by byte count. All layout parsing uses
//! compile-time verified layouts via `zerocopy`; there is no length field to
//! trust and no "fast path" that skips the 64-byte check.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod frame;
pub mod serializer;
pub mod stream;

pub use errors::{Result, WireError};
pub use frame::Frame;
pub use serializer::{FrameCollector, FrameSerializer};
pub use stream::{Beat, StreamSlot};

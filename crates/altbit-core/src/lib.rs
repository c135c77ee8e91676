//! Alternating-bit transport core logic
//!
//! Pure state machine logic for a stop-and-wait ARQ link, completely
//! decoupled from I/O. This enables deterministic testing of the timing race
//! at the heart of the protocol: an incoming acknowledgment against an
//! expiring retry timer.
//!
//! # Architecture
//!
//! Protocol logic in this crate is implemented as deterministic state
//! machines that are isolated from I/O, time, and scheduling. The current
//! cycle is supplied explicitly by the caller, and state transitions produce
//! declarative actions that describe intended effects rather than executing
//! them directly. A runtime or test harness is responsible for interpreting
//! and executing those actions.
//!
//! Execution is cycle-synchronous: one control loop per direction, no
//! preemptive concurrency, and suspension only at handshake boundaries. The
//! sender and the acknowledgment side communicate exclusively through wire
//! frames.
//!
//! # Components
//!
//! - [`transmitter`]: stop-and-wait ARQ sender (submit, timeout, retransmit)
//! - [`ack`]: free-running acknowledgment generator
//! - [`receiver`]: application-facing delivery stage
//! - [`transform`]: pluggable next-value seam
//! - [`store`]: single-port synchronous frame staging memory
//! - [`clock`]: cycle counter supplied to every time-dependent method
//! - [`error`]: transport error types

pub mod ack;
pub mod clock;
pub mod config;
pub mod error;
pub mod receiver;
pub mod store;
pub mod transform;
pub mod transmitter;

pub use ack::AckGenerator;
pub use clock::Cycle;
pub use config::ArqConfig;
pub use error::ArqError;
pub use receiver::{Delivery, Receiver};
pub use store::FrameStore;
pub use transform::{Increment, ValueTransform};
pub use transmitter::{Transmitter, TransmitterAction, TransmitterState};

//! Deterministic simulation harness for the altbit transport.
//!
//! Cycle-stepped implementations of the bus ports and an erasure-channel
//! link model, for deterministic, reproducible testing of the ARQ engine
//! under frame loss, latency, and backpressure.
//!
//! The [`World`] wires a free-running sender and an acknowledging responder
//! over two fault-injectable [`Link`]s and advances the whole system one
//! cycle at a time. Faults are driven by a seeded RNG, so any observed
//! behavior can be replayed from its seed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod endpoint;
pub mod link;
pub mod world;

pub use endpoint::{ResponderEndpoint, SenderEndpoint};
pub use link::{FaultPlan, Link};
pub use world::{World, WorldConfig};

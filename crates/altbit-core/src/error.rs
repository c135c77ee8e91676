//! Transport error types.

use altbit_proto::WireError;
use thiserror::Error;

use crate::transmitter::TransmitterState;

/// Errors surfaced by the ARQ state machines.
///
/// Note what is *not* here: a timeout. Timer-driven retransmission is the
/// designed recovery path, reported as an ordinary action, and retry is
/// unbounded. Reset is the only way out of an unacknowledged send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArqError {
    /// A frame failed the wire-level length or framing invariants.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// A value was submitted while a packet is still outstanding.
    ///
    /// This is a refusal, not a fault: state is untouched and the caller
    /// retries once `ready` is asserted again.
    #[error("submission refused: transmitter is {state:?}, not Idle")]
    ProtocolStall {
        /// State the transmitter was in when the submission arrived.
        state: TransmitterState,
    },

    /// An operation was invoked in a state where it has no meaning.
    #[error("operation {operation} invalid in state {state:?}")]
    InvalidState {
        /// State at the time of the call.
        state: TransmitterState,
        /// The rejected operation.
        operation: &'static str,
    },

    /// A frame arrived while a previous delivery is still unconsumed.
    ///
    /// Upstream backpressure: hold the frame until the consumer takes the
    /// pending delivery.
    #[error("delivery slot occupied")]
    DeliveryPending,
}

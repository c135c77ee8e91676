//! Transport configuration.

/// Sender-side ARQ configuration.
///
/// Construction-time constants; nothing here is runtime-mutable. Bus width
/// and value width are parameters of the wire types in `altbit-proto`, and
/// the frame size is fixed at 64 bytes.
#[derive(Debug, Clone)]
pub struct ArqConfig {
    /// Cycles to wait for a matching acknowledgment before retransmitting.
    pub timeout_cycles: u64,
}

impl Default for ArqConfig {
    fn default() -> Self {
        Self { timeout_cycles: 256 }
    }
}

//! Single-port synchronous frame store.
//!
//! A 64-byte random-access staging memory with hardware port semantics: one
//! address decoded per cycle, write-enable gating mutation, and a read
//! issued at cycle N observed at cycle N+1 (registered, read-first output).
//! The port is non-reentrant: there is exactly one access in flight, which
//! is what [`clock`](FrameStore::clock) models.
//!
//! Used as the staging buffer for whole in-flight frames; the
//! [`write_frame`](FrameStore::write_frame) and
//! [`read_frame`](FrameStore::read_frame) helpers drive the port protocol
//! byte by byte.

use altbit_proto::Frame;

/// Address mask; the store decodes a 6-bit address.
const ADDR_MASK: usize = Frame::SIZE - 1;

/// Single-port synchronous RAM, one frame deep.
#[derive(Debug, Clone)]
pub struct FrameStore {
    mem: [u8; Frame::SIZE],
    data_out: u8,
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStore {
    /// Create a zeroed store.
    pub fn new() -> Self {
        Self { mem: [0; Frame::SIZE], data_out: 0 }
    }

    /// One port cycle.
    ///
    /// With `en` low the port holds its output. With `en` high the addressed
    /// byte is registered onto `data_out` (observable next cycle), and with
    /// `we` also high, `data_in` is written after the read (read-first).
    pub fn clock(&mut self, en: bool, we: bool, addr: usize, data_in: u8) {
        if !en {
            return;
        }
        let addr = addr & ADDR_MASK;
        let read = self.mem[addr];
        if we {
            self.mem[addr] = data_in;
        }
        self.data_out = read;
    }

    /// The registered read output: the byte addressed on the previous
    /// enabled cycle.
    #[must_use]
    pub fn data_out(&self) -> u8 {
        self.data_out
    }

    /// Stage a whole frame, one byte per cycle.
    pub fn write_frame(&mut self, frame: &Frame) {
        for (addr, byte) in frame.as_slice().iter().enumerate() {
            self.clock(true, true, addr, *byte);
        }
    }

    /// Read the staged frame back out, honoring the one-cycle read latency.
    #[must_use]
    pub fn read_frame(&mut self) -> [u8; Frame::SIZE] {
        let mut out = [0u8; Frame::SIZE];
        self.clock(true, false, 0, 0);
        for addr in 1..Frame::SIZE {
            out[addr - 1] = self.data_out;
            self.clock(true, false, addr, 0);
        }
        out[Frame::SIZE - 1] = self.data_out;
        out
    }
}

//! Multi-beat bus serializer and collector.
//!
//! A 64-byte [`Frame`] crosses a bus of `width` bytes as `ceil(64 / width)`
//! beats, byte order preserved (most-significant beat first). The final beat
//! carries the boundary marker and, when the width does not divide 64, fewer
//! bytes than the rest.
//!
//! [`FrameSerializer`] is the transmit half: it holds the current beat stable
//! until the peer consumes it, then advances. [`FrameCollector`] is the
//! receive half: it accumulates beats until a boundary, yielding the raw
//! frame bytes and resetting its buffer after every frame. Accumulation is
//! bounded by the frame size: a stream that overruns it without a boundary
//! is rejected at the overflowing beat.

use bytes::Bytes;

use crate::{
    errors::WireError,
    frame::Frame,
    stream::Beat,
};

fn check_width(width: usize) -> Result<(), WireError> {
    if width == 0 || width > Frame::SIZE {
        return Err(WireError::InvalidWidth { width });
    }
    Ok(())
}

/// Transmit side: emits one frame as a sequence of beats.
#[derive(Debug)]
pub struct FrameSerializer {
    bytes: Bytes,
    width: usize,
    offset: usize,
}

impl FrameSerializer {
    /// Begin serializing `frame` across a bus of `width` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidWidth`] if `width` is zero or wider than a
    /// whole frame.
    pub fn new(frame: &Frame, width: usize) -> Result<Self, WireError> {
        check_width(width)?;
        Ok(Self { bytes: Bytes::copy_from_slice(frame.as_slice()), width, offset: 0 })
    }

    /// Number of beats a frame occupies at this serializer's width.
    pub fn beat_count(&self) -> usize {
        Frame::SIZE.div_ceil(self.width)
    }

    /// The beat currently on offer, or `None` once the frame has fully
    /// transferred.
    ///
    /// Repeated calls return the same beat until [`advance`](Self::advance)
    /// is called; withholding `advance` while the peer is not ready is how
    /// backpressure propagates.
    pub fn peek(&self) -> Option<Beat> {
        if self.offset >= Frame::SIZE {
            return None;
        }
        let end = (self.offset + self.width).min(Frame::SIZE);
        Some(Beat::new(self.bytes.slice(self.offset..end), end == Frame::SIZE))
    }

    /// Mark the current beat as consumed by the peer.
    pub fn advance(&mut self) {
        self.offset = (self.offset + self.width).min(Frame::SIZE);
    }

    /// Whether every beat of the frame has been consumed.
    pub fn is_done(&self) -> bool {
        self.offset >= Frame::SIZE
    }
}

/// Receive side: accumulates beats back into raw frame bytes.
#[derive(Debug)]
pub struct FrameCollector {
    buf: Vec<u8>,
    width: usize,
}

impl FrameCollector {
    /// Create a collector for a bus of `width` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidWidth`] if `width` is zero or wider than a
    /// whole frame.
    pub fn new(width: usize) -> Result<Self, WireError> {
        check_width(width)?;
        Ok(Self { buf: Vec::with_capacity(Frame::SIZE), width })
    }

    /// Absorb one beat.
    ///
    /// Returns the assembled frame bytes when `beat` carries the boundary
    /// marker. The internal buffer is reset after every boundary and after
    /// every error, so one bad frame never poisons the next.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TruncatedFrame`] if the boundary arrives before a
    /// full frame's worth of bytes has accumulated, and
    /// [`WireError::MalformedFrame`] the moment accumulation exceeds a whole
    /// frame with no boundary in sight. A peer that never asserts the
    /// boundary marker is rejected at the overflowing beat rather than
    /// buffered without bound.
    pub fn push(&mut self, beat: &Beat) -> Result<Option<Bytes>, WireError> {
        self.buf.extend_from_slice(&beat.data);
        if self.buf.len() > Frame::SIZE {
            let actual = self.buf.len();
            self.buf.clear();
            return Err(WireError::MalformedFrame { expected: Frame::SIZE, actual });
        }
        if !beat.last {
            return Ok(None);
        }

        let received = self.buf.len();
        let bytes = Bytes::from(std::mem::take(&mut self.buf));
        if received < Frame::SIZE {
            return Err(WireError::TruncatedFrame { received, expected: Frame::SIZE });
        }
        Ok(Some(bytes))
    }

    /// Bytes accumulated toward the frame in progress.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Number of beats a full frame occupies at this collector's width.
    pub fn beat_count(&self) -> usize {
        Frame::SIZE.div_ceil(self.width)
    }

    /// Discard any partial frame. Reset path only.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

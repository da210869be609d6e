//! Receive buffer and byte sinks
//!
//! Master reads and slave receive cycles both deposit bytes into a
//! [`ByteSink`]. The driver owns one [`ReceiveBuffer`]; callers that want the
//! bytes somewhere else pass their own sink.

/// Receive buffer capacity in bytes
pub const BUFFER_CAPACITY: usize = 32;

/// Destination for received bytes
pub trait ByteSink {
    /// Append a byte
    ///
    /// Returns false, and stores nothing, if the sink is full.
    fn push_byte(&mut self, byte: u8) -> bool;

    /// Number of bytes that can still be appended
    fn remaining(&self) -> usize;
}

/// Fixed-capacity receive buffer with a read cursor
///
/// Invariant: `index + length <= BUFFER_CAPACITY`.
#[derive(Debug, Clone)]
pub struct ReceiveBuffer {
    data: [u8; BUFFER_CAPACITY],
    index: usize,
    length: usize,
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiveBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: [0; BUFFER_CAPACITY],
            index: 0,
            length: 0,
        }
    }

    /// Forget all stored bytes and rewind the cursor
    pub fn reset(&mut self) {
        self.index = 0;
        self.length = 0;
    }

    /// Move the read cursor back to the first stored byte
    pub fn rewind(&mut self) {
        self.length += self.index;
        self.index = 0;
    }

    /// Take the next unread byte
    pub fn read_buffer(&mut self) -> Option<u8> {
        if self.length == 0 {
            return None;
        }
        let byte = self.data[self.index];
        self.index += 1;
        self.length -= 1;
        Some(byte)
    }

    /// Populated region, including bytes already drained
    pub fn get_buffer(&self) -> &[u8] {
        &self.data[..self.index + self.length]
    }

    /// Bytes not yet drained
    pub fn unread(&self) -> &[u8] {
        &self.data[self.index..self.index + self.length]
    }

    /// Number of bytes not yet drained
    pub fn available(&self) -> usize {
        self.length
    }

    /// Read cursor position
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true if no more bytes can be stored
    pub fn is_full(&self) -> bool {
        self.index + self.length == BUFFER_CAPACITY
    }
}

impl ByteSink for ReceiveBuffer {
    fn push_byte(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.data[self.index + self.length] = byte;
        self.length += 1;
        true
    }

    fn remaining(&self) -> usize {
        BUFFER_CAPACITY - self.index - self.length
    }
}

/// Caller-owned slice with a write cursor
///
/// Lets a read land at an arbitrary offset of an existing buffer, with the
/// cursor advanced past the received bytes.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    /// Sink writing from the start of `buf`
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Sink writing from `pos`, clamped to the slice length
    pub fn with_cursor(buf: &'a mut [u8], pos: usize) -> Self {
        let pos = pos.min(buf.len());
        Self { buf, pos }
    }

    /// Current write cursor
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes written so far, from the start of the slice
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl ByteSink for SliceSink<'_> {
    fn push_byte(&mut self, byte: u8) -> bool {
        match self.buf.get_mut(self.pos) {
            Some(slot) => {
                *slot = byte;
                self.pos += 1;
                true
            }
            None => false,
        }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl<const N: usize> ByteSink for heapless::Vec<u8, N> {
    fn push_byte(&mut self, byte: u8) -> bool {
        self.push(byte).is_ok()
    }

    fn remaining(&self) -> usize {
        N - self.len()
    }
}

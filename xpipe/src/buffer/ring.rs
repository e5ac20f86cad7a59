//! Ring buffer implementation for efficient data buffering.
//!
//! This module provides a fixed-capacity ring buffer holding the
//! bytes accepted by writers but not yet drained by readers.

/// A fixed-capacity ring buffer for efficient FIFO byte operations.
///
/// The capacity is chosen at construction and never changes. Reads and
/// writes handle wrap-around, so the buffer is suitable for streaming
/// data of any total length.
#[derive(Debug)]
pub struct RingBuffer {
    /// The underlying storage.
    buffer: Box<[u8]>,

    /// Read position (head).
    head: usize,

    /// Write position (tail).
    tail: usize,

    /// Current number of bytes in buffer.
    len: usize,
}

impl RingBuffer {
    /// Creates a new empty ring buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the buffer is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// Returns the buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of bytes that can be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.len
    }

    /// Writes data to the buffer.
    ///
    /// Copies as many bytes as fit in the remaining free space and
    /// returns the number of bytes written, which may be less than
    /// `data.len()`.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = self.buffer.len();
        let to_write = core::cmp::min(data.len(), self.remaining());
        if to_write == 0 {
            return 0;
        }

        // Calculate how much we can write before wrapping
        let first_chunk = core::cmp::min(to_write, n - self.tail);
        self.buffer[self.tail..self.tail + first_chunk].copy_from_slice(&data[..first_chunk]);

        // Handle wrap-around
        if to_write > first_chunk {
            let second_chunk = to_write - first_chunk;
            self.buffer[..second_chunk].copy_from_slice(&data[first_chunk..to_write]);
        }

        self.tail = (self.tail + to_write) % n;
        self.len += to_write;

        to_write
    }

    /// Reads data from the front of the buffer.
    ///
    /// Returns the number of bytes read, which may be less than
    /// `buf.len()` if fewer bytes are available.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = self.buffer.len();
        let to_read = core::cmp::min(buf.len(), self.len);
        if to_read == 0 {
            return 0;
        }

        // Calculate how much we can read before wrapping
        let first_chunk = core::cmp::min(to_read, n - self.head);
        buf[..first_chunk].copy_from_slice(&self.buffer[self.head..self.head + first_chunk]);

        // Handle wrap-around
        if to_read > first_chunk {
            let second_chunk = to_read - first_chunk;
            buf[first_chunk..to_read].copy_from_slice(&self.buffer[..second_chunk]);
        }

        self.head = (self.head + to_read) % n;
        self.len -= to_read;

        to_read
    }
}

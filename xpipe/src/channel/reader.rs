//! Read end of the channel.

use std::sync::Arc;
use std::time::Instant;

use super::{ChannelState, Mode, Shared};
use crate::error::{Error, ErrorKind, Result};

/// The read end of a bounded byte channel.
///
/// Bytes come out in the order the channel accepted them. An empty
/// read result is reserved for end-of-stream: while any write end
/// remains open, an empty buffer yields blocking or `WouldBlock`,
/// never an empty success.
#[derive(Debug)]
pub struct PipeReader {
    shared: Arc<Shared>,
    mode: Mode,
    closed: bool,
}

impl PipeReader {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        PipeReader {
            shared,
            mode: Mode::Blocking,
            closed: false,
        }
    }

    /// Returns this handle's blocking mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Sets this handle's blocking mode.
    ///
    /// Takes effect on the next operation issued through this handle;
    /// other handles are unaffected.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Returns the current channel state.
    pub fn state(&self) -> ChannelState {
        self.shared.state()
    }

    /// Reads bytes from the channel into `buf`.
    ///
    /// Returns the number of bytes read. Never blocks while any data
    /// is buffered, and may return fewer bytes than `buf` holds.
    ///
    /// `Ok(0)` on a non-empty `buf` means end-of-stream: every write
    /// end is closed and the buffer is drained; no further data will
    /// ever arrive. With writers still open, an empty buffer blocks
    /// (in [`Mode::Blocking`]) or fails with `WouldBlock` (in
    /// [`Mode::NonBlocking`]).
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read_inner(buf, None)
    }

    /// Reads up to `max_bytes` bytes from the channel.
    ///
    /// An empty result means end-of-stream. Fails with `InvalidLimit`
    /// when `max_bytes` is zero, since a zero limit would make an
    /// empty success indistinguishable from end-of-stream.
    pub fn read_bytes(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        self.read_bytes_inner(max_bytes, None)
    }

    /// Reads up to `max_bytes` bytes, giving up at `deadline`.
    ///
    /// Identical to [`read_bytes`](Self::read_bytes), except that a
    /// blocking wait returns `WouldBlock` once `deadline` passes, with
    /// no bytes consumed.
    pub fn read_bytes_deadline(&mut self, max_bytes: usize, deadline: Instant) -> Result<Vec<u8>> {
        self.read_bytes_inner(max_bytes, Some(deadline))
    }

    fn read_bytes_inner(&mut self, max_bytes: usize, deadline: Option<Instant>) -> Result<Vec<u8>> {
        if max_bytes == 0 {
            return Err(Error::new(ErrorKind::InvalidLimit));
        }
        // A single read can never yield more than the channel holds,
        // so an oversized limit must not drive the allocation.
        let mut buf = vec![0u8; max_bytes.min(self.shared.capacity())];
        let read = self.read_inner(&mut buf, deadline)?;
        buf.truncate(read);
        Ok(buf)
    }

    fn read_inner(&mut self, buf: &mut [u8], deadline: Option<Instant>) -> Result<usize> {
        if self.closed {
            return Err(Error::new(ErrorKind::ClosedHandle));
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let mut inner = self.shared.lock();
        loop {
            if !inner.buf.is_empty() {
                let read = inner.buf.read(buf);
                drop(inner);
                self.shared.writable().notify_all();
                log::trace!("read {read} bytes");
                return Ok(read);
            }

            // Drained: distinguish end-of-stream from a transient gap.
            if inner.writers == 0 {
                log::debug!("end of stream");
                return Ok(0);
            }

            match self.mode {
                Mode::NonBlocking => return Err(Error::new(ErrorKind::WouldBlock)),
                Mode::Blocking => {
                    inner = match deadline {
                        None => self
                            .shared
                            .readable()
                            .wait(inner)
                            .unwrap_or_else(|e| e.into_inner()),
                        Some(deadline) => {
                            let now = Instant::now();
                            if now >= deadline {
                                return Err(Error::new(ErrorKind::WouldBlock));
                            }
                            self.shared
                                .readable()
                                .wait_timeout(inner, deadline - now)
                                .unwrap_or_else(|e| e.into_inner())
                                .0
                        }
                    };
                    // Re-check the exit conditions: the wakeup may have
                    // been spurious or meant for another waiter.
                }
            }
        }
    }

    /// Returns a new read end referencing the same channel.
    ///
    /// The new handle starts in this handle's current mode. Fails with
    /// `ClosedHandle` if this handle was closed.
    pub fn duplicate(&self) -> Result<Self> {
        if self.closed {
            return Err(Error::new(ErrorKind::ClosedHandle));
        }
        self.shared.add_reader();
        Ok(PipeReader {
            shared: self.shared.clone(),
            mode: self.mode,
            closed: false,
        })
    }

    /// Closes this read end.
    ///
    /// When the last read end closes, any write attempt fails with
    /// `BrokenChannel` and suspended writers are woken. Calling `close`
    /// twice on the same handle fails with `DoubleClose`. A handle
    /// dropped without an explicit close is closed implicitly.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::new(ErrorKind::DoubleClose));
        }
        self.closed = true;
        self.shared.release_reader();
        Ok(())
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            self.shared.release_reader();
        }
    }
}

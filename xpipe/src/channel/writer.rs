//! Write end of the channel.

use std::sync::Arc;
use std::time::Instant;

use super::{ChannelState, Mode, Shared};
use crate::error::{Error, ErrorKind, Result};

/// The write end of a bounded byte channel.
///
/// Bytes pushed through a `PipeWriter` land in the channel's buffer in
/// call order and are drained by the [`PipeReader`](super::PipeReader)
/// side. Writers observe backpressure when the buffer is full and
/// `BrokenChannel` once every read end is gone.
#[derive(Debug)]
pub struct PipeWriter {
    shared: Arc<Shared>,
    mode: Mode,
    closed: bool,
}

impl PipeWriter {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        PipeWriter {
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

    /// Writes bytes into the channel.
    ///
    /// Copies as many bytes from `data` as fit in the buffer's free
    /// space and returns the count actually copied, which may be less
    /// than `data.len()`. Callers needing full delivery must re-invoke
    /// with the remainder.
    ///
    /// Fails with `BrokenChannel` as soon as no read end remains open,
    /// regardless of buffer occupancy. On a full buffer, blocks until
    /// space appears (in [`Mode::Blocking`]) or fails with `WouldBlock`
    /// (in [`Mode::NonBlocking`]).
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.write_inner(data, None)
    }

    /// Writes bytes into the channel, giving up at `deadline`.
    ///
    /// Identical to [`write`](Self::write), except that a blocking wait
    /// returns `WouldBlock` once `deadline` passes, with no bytes
    /// consumed.
    pub fn write_deadline(&mut self, data: &[u8], deadline: Instant) -> Result<usize> {
        self.write_inner(data, Some(deadline))
    }

    fn write_inner(&mut self, data: &[u8], deadline: Option<Instant>) -> Result<usize> {
        if self.closed {
            return Err(Error::new(ErrorKind::ClosedHandle));
        }

        let mut inner = self.shared.lock();
        loop {
            // A writer with no readers fails no matter how much space
            // is left; nothing can ever drain what it would write.
            // That holds even for a zero-length write.
            if inner.readers == 0 {
                log::debug!("write on channel with no read ends");
                return Err(Error::new(ErrorKind::BrokenChannel));
            }
            if data.is_empty() {
                return Ok(0);
            }

            let written = inner.buf.write(data);
            if written > 0 {
                drop(inner);
                self.shared.readable().notify_all();
                log::trace!("wrote {written} of {} bytes", data.len());
                return Ok(written);
            }

            // Buffer full
            match self.mode {
                Mode::NonBlocking => return Err(Error::new(ErrorKind::WouldBlock)),
                Mode::Blocking => {
                    inner = match deadline {
                        None => self
                            .shared
                            .writable()
                            .wait(inner)
                            .unwrap_or_else(|e| e.into_inner()),
                        Some(deadline) => {
                            let now = Instant::now();
                            if now >= deadline {
                                return Err(Error::new(ErrorKind::WouldBlock));
                            }
                            self.shared
                                .writable()
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

    /// Returns a new write end referencing the same channel.
    ///
    /// The new handle starts in this handle's current mode. Fails with
    /// `ClosedHandle` if this handle was closed.
    pub fn duplicate(&self) -> Result<Self> {
        if self.closed {
            return Err(Error::new(ErrorKind::ClosedHandle));
        }
        self.shared.add_writer();
        Ok(PipeWriter {
            shared: self.shared.clone(),
            mode: self.mode,
            closed: false,
        })
    }

    /// Closes this write end.
    ///
    /// When the last write end closes, readers drain whatever is
    /// buffered and then observe end-of-stream. Calling `close` twice
    /// on the same handle is a programming error and fails with
    /// `DoubleClose`. A handle dropped without an explicit close is
    /// closed implicitly.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::new(ErrorKind::DoubleClose));
        }
        self.closed = true;
        self.shared.release_writer();
        Ok(())
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            self.shared.release_writer();
        }
    }
}

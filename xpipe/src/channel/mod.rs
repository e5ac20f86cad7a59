//! Write and read endpoints of the bounded byte channel.
//!
//! This module provides the shared channel state and the two endpoint
//! handle types built on top of it.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::buffer::RingBuffer;
use crate::error::{Error, ErrorKind, Result};

mod reader;
mod writer;

pub use reader::PipeReader;
pub use writer::PipeWriter;

/// Channel state, as observed through any handle.
///
/// Transitions are driven solely by handle closes; a channel never
/// returns to `Open` once either side has fully closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Both sides have live handles.
    Open,

    /// All write ends are closed; reads drain then report end-of-stream.
    WriteClosed,

    /// All read ends are closed; writes fail with `BrokenChannel`.
    ReadClosed,

    /// Both sides are closed; the channel is defunct.
    FullyClosed,
}

/// Blocking behavior of an endpoint handle.
///
/// The mode is a per-handle attribute: changing it affects only the
/// handle it was set on, never the channel or other handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Operations that cannot complete immediately suspend the caller.
    Blocking,

    /// Operations that cannot complete immediately fail with `WouldBlock`.
    NonBlocking,
}

/// Mutable channel state: the byte buffer and both endpoint refcounts.
///
/// Every field is guarded by the single mutex in [`Shared`]; refcount
/// checks and buffer mutations are always observed consistently.
#[derive(Debug)]
pub(crate) struct Inner {
    /// Bytes accepted but not yet drained.
    pub(crate) buf: RingBuffer,

    /// Count of live write end handles.
    pub(crate) writers: usize,

    /// Count of live read end handles.
    pub(crate) readers: usize,
}

/// The channel shared by every live endpoint handle.
#[derive(Debug)]
pub(crate) struct Shared {
    inner: Mutex<Inner>,

    /// Signaled when bytes arrive or the last write end closes.
    readable: Condvar,

    /// Signaled when space appears or the last read end closes.
    writable: Condvar,
}

impl Shared {
    fn new(capacity: usize) -> Self {
        Shared {
            inner: Mutex::new(Inner {
                buf: RingBuffer::new(capacity),
                writers: 1,
                readers: 1,
            }),
            readable: Condvar::new(),
            writable: Condvar::new(),
        }
    }

    /// Locks the channel state, recovering from a poisoned mutex.
    ///
    /// The guarded state is valid after any panic: the copy routines in
    /// `RingBuffer` update their cursors only after a completed copy.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the channel's fixed capacity.
    pub(crate) fn capacity(&self) -> usize {
        self.lock().buf.capacity()
    }

    pub(crate) fn state(&self) -> ChannelState {
        let inner = self.lock();
        match (inner.writers > 0, inner.readers > 0) {
            (true, true) => ChannelState::Open,
            (false, true) => ChannelState::WriteClosed,
            (true, false) => ChannelState::ReadClosed,
            (false, false) => ChannelState::FullyClosed,
        }
    }

    /// Registers one more write end handle.
    pub(crate) fn add_writer(&self) {
        let mut inner = self.lock();
        inner.writers += 1;
        log::trace!("write end duplicated, {} live", inner.writers);
    }

    /// Registers one more read end handle.
    pub(crate) fn add_reader(&self) {
        let mut inner = self.lock();
        inner.readers += 1;
        log::trace!("read end duplicated, {} live", inner.readers);
    }

    /// Releases one write end handle.
    ///
    /// When the last write end goes away, every reader suspended on an
    /// empty buffer is woken so it can report end-of-stream.
    pub(crate) fn release_writer(&self) {
        let mut inner = self.lock();
        inner.writers -= 1;
        let last = inner.writers == 0;
        drop(inner);
        if last {
            log::debug!("last write end closed");
            self.readable.notify_all();
        }
    }

    /// Releases one read end handle.
    ///
    /// When the last read end goes away, every writer suspended on a
    /// full buffer is woken so it can fail with `BrokenChannel`.
    pub(crate) fn release_reader(&self) {
        let mut inner = self.lock();
        inner.readers -= 1;
        let last = inner.readers == 0;
        drop(inner);
        if last {
            log::debug!("last read end closed");
            self.writable.notify_all();
        }
    }

    pub(crate) fn readable(&self) -> &Condvar {
        &self.readable
    }

    pub(crate) fn writable(&self) -> &Condvar {
        &self.writable
    }
}

/// Creates a bounded byte channel, returning its two endpoints.
///
/// The channel starts empty, with exactly one live handle per side.
/// Both handles begin in [`Mode::Blocking`].
///
/// Fails with `InvalidCapacity` if `capacity` is zero.
///
/// # Example
///
/// ```
/// let (mut writer, mut reader) = xpipe::pipe(16).unwrap();
/// assert_eq!(writer.write(b"hi").unwrap(), 2);
/// assert_eq!(reader.read_bytes(16).unwrap(), b"hi");
/// ```
pub fn pipe(capacity: usize) -> Result<(PipeWriter, PipeReader)> {
    if capacity == 0 {
        return Err(Error::new(ErrorKind::InvalidCapacity));
    }

    let shared = std::sync::Arc::new(Shared::new(capacity));
    log::trace!("channel created, capacity {capacity}");

    Ok((
        PipeWriter::new(shared.clone()),
        PipeReader::new(shared),
    ))
}

//! # XPipe - A Bounded Byte Channel
//!
//! XPipe is a bounded single-producer/single-consumer byte channel with
//! explicit end-of-stream and broken-channel semantics:
//!
//! - **Fixed capacity**: a ring buffer sized at creation provides
//!   backpressure; a full buffer blocks writers, never grows
//! - **Duplicable endpoints**: both ends can be duplicated and closed
//!   independently; the channel tracks live handles per side
//! - **Blocking and non-blocking modes**: chosen per handle, switchable
//!   at any time without touching shared state
//! - **Distinct terminal outcomes**: an empty read means end-of-stream
//!   (all write ends closed, buffer drained); a write with no read ends
//!   left fails with `BrokenChannel`
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐                          ┌──────────────┐
//! │  PipeWriter  │── write ──┐  ┌── read ──│  PipeReader  │
//! │ (duplicable) │           │  │          │ (duplicable) │
//! └──────────────┘           ▼  ▼          └──────────────┘
//!                     ┌─────────────────┐
//!                     │     Channel     │
//!                     │  ring buffer +  │
//!                     │ side refcounts  │
//!                     └─────────────────┘
//! ```
//!
//! The channel state sits behind one mutex; blocked operations suspend
//! on a condition variable and are woken by data, space, or the
//! opposite side fully closing.
//!
//! ## Example
//!
//! ```rust
//! use xpipe::{pipe, Mode};
//!
//! let (mut writer, mut reader) = pipe(16)?;
//!
//! // Partial write: only 16 of 17 bytes fit.
//! let written = writer.write(b"hello,i am child!")?;
//! assert_eq!(written, 16);
//!
//! let data = reader.read_bytes(1024)?;
//! assert_eq!(data.len(), 16);
//!
//! // With the writer gone, the reader sees end-of-stream.
//! writer.close()?;
//! assert!(reader.read_bytes(1024)?.is_empty());
//! # Ok::<(), xpipe::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod channel;
pub mod error;
mod io;

// Re-export commonly used types
pub use channel::{pipe, ChannelState, Mode, PipeReader, PipeWriter};
pub use error::{Error, ErrorKind, Result};

/// Capacity of a channel created by [`pipe_default`], matching the
/// conventional kernel pipe buffer size.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Creates a channel with [`DEFAULT_CAPACITY`].
pub fn pipe_default() -> (PipeWriter, PipeReader) {
    match pipe(DEFAULT_CAPACITY) {
        Ok(ends) => ends,
        // DEFAULT_CAPACITY is non-zero, the only failure condition.
        Err(_) => unreachable!(),
    }
}

//! Error types for channel operations.

use core::fmt;

/// The category of a channel error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `pipe` was called with a capacity of zero.
    InvalidCapacity,
    /// A read was requested with a byte limit of zero.
    InvalidLimit,
    /// A non-blocking operation could not complete immediately.
    /// Retrying later may succeed; no bytes were consumed or produced.
    WouldBlock,
    /// A write was attempted while no read end remains open.
    /// No further data can ever be consumed from this channel.
    BrokenChannel,
    /// An operation was attempted through a handle that has been closed.
    ClosedHandle,
    /// `close` was called twice on the same handle.
    DoubleClose,
}

/// An error returned by a channel operation.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Error { kind }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidCapacity => write!(f, "Channel capacity must be positive"),
            ErrorKind::InvalidLimit => write!(f, "Read limit must be positive"),
            ErrorKind::WouldBlock => write!(f, "Operation would block"),
            ErrorKind::BrokenChannel => write!(f, "All read ends are closed"),
            ErrorKind::ClosedHandle => write!(f, "Handle is closed"),
            ErrorKind::DoubleClose => write!(f, "Handle was already closed"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> std::io::Error {
        let kind = match err.kind {
            ErrorKind::WouldBlock => std::io::ErrorKind::WouldBlock,
            ErrorKind::BrokenChannel => std::io::ErrorKind::BrokenPipe,
            ErrorKind::InvalidCapacity | ErrorKind::InvalidLimit => {
                std::io::ErrorKind::InvalidInput
            }
            ErrorKind::ClosedHandle | ErrorKind::DoubleClose => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

/// Result alias for channel operations.
pub type Result<T> = core::result::Result<T, Error>;

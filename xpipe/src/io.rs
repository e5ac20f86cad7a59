//! `std::io` adapters for the endpoint handles.
//!
//! These impls let the endpoints plug into code written against the
//! standard I/O traits: `Read::read` returning `Ok(0)` maps onto the
//! channel's end-of-stream, `WouldBlock` and `BrokenChannel` surface
//! as the matching `std::io::ErrorKind`s.

use crate::channel::{PipeReader, PipeWriter};

impl std::io::Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        PipeReader::read(self, buf).map_err(Into::into)
    }
}

impl std::io::Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        PipeWriter::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // Writes land in the shared buffer as they are accepted;
        // there is no intermediate stage to flush.
        Ok(())
    }
}

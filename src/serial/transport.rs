//! Transport abstraction — any byte-oriented receive channel.
//!
//! Concrete implementations:
//! - UART (the USB bridge on the dev board), see `adapters::uart`
//! - [`NullTransport`] when no link is wired up
//!
//! The line reader is generic over `Transport`, so adding a new
//! transport requires zero changes to the ingestion logic.

/// Byte-oriented receive channel. The link is inbound only.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Check if data is available for reading. The line reader skips
    /// `read` entirely while this is false.
    fn available(&self) -> bool;
}

/// A null transport that never has data.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn available(&self) -> bool {
        false
    }
}

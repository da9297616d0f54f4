// libsuica/src/transport/traits.rs

use crate::Result;

/// Transport trait abstracts I/O away from protocol/session logic.
///
/// A transport carries whole FeliCa frames: `send` takes one encoded
/// command frame and `receive` returns one response frame.
pub trait Transport {
    /// Send raw bytes to the reader
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive raw bytes from the reader with a timeout in milliseconds.
    /// Fails with [`crate::Error::Timeout`] when nothing answered.
    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>>;

    /// Perform a transport-level reset
    fn reset(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>> {
        (**self).receive(timeout_ms)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

//! Transport trait for device communication.
//!
//! The [`Transport`] trait abstracts over the physical link to the
//! power-distribution unit. Implementations exist for serial ports
//! (`pdulib-transport`) and mock transports for testing
//! (`pdulib-test-harness`).
//!
//! The protocol engine in `pdulib` operates on a `Transport` rather than
//! directly on a serial port, enabling both real hardware control and
//! deterministic unit testing with `MockTransport`.

use std::time::Duration;

use crate::error::Result;

/// Blocking byte-level transport to the device.
///
/// Implementations handle the physical layer only: opening, raw reads and
/// writes, and timeouts. Framing and field decoding are handled by the
/// driver that consumes this trait.
///
/// The driver never opens or closes the transport on its own; it only
/// writes requests and reads replies through it.
pub trait Transport: Send {
    /// Send raw bytes to the device.
    ///
    /// Blocks until all bytes have been handed to the underlying
    /// transport (serial TX buffer, etc.).
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the device into the provided buffer.
    ///
    /// Returns the number of bytes actually read, which may be fewer than
    /// `buf.len()` -- replies arrive in arbitrary chunks. Waits up to
    /// `timeout` for data; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if nothing arrives within the deadline.
    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}

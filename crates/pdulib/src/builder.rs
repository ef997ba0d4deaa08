//! PduBuilder -- fluent builder for constructing [`Pdu`] instances.
//!
//! Separates configuration from construction so that callers can set up
//! serial parameters, the read timeout, and the framing policy before the
//! transport connection is established.
//!
//! # Example
//!
//! ```no_run
//! use pdulib::builder::PduBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> pdulib_core::Result<()> {
//! let pdu = PduBuilder::new()
//!     .port("/dev/ttyUSB0")
//!     .read_timeout(Duration::from_millis(300))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use pdulib_core::error::{Error, Result};
use pdulib_core::transport::Transport;
use pdulib_transport::{SerialConfig, SerialTransport};

use crate::device::Pdu;
use crate::protocol::FramingMode;

/// Fluent builder for [`Pdu`].
///
/// Defaults match the device: 19200 baud 8N1, a 500 ms read timeout, and
/// the current firmware's nul-delimited framing. Only the port path has
/// no default.
pub struct PduBuilder {
    port: Option<String>,
    serial_config: SerialConfig,
    read_timeout: Duration,
    framing: FramingMode,
}

impl PduBuilder {
    /// Create a builder with device defaults.
    pub fn new() -> Self {
        PduBuilder {
            port: None,
            serial_config: SerialConfig::default(),
            read_timeout: Duration::from_millis(500),
            framing: FramingMode::default(),
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM3`).
    pub fn port(mut self, path: &str) -> Self {
        self.port = Some(path.to_string());
        self
    }

    /// Override the default 19200 baud rate.
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.serial_config.baud_rate = baud;
        self
    }

    /// Set the per-read transport timeout (default: 500 ms).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Select the reply framing policy (default:
    /// [`FramingMode::NulDelimited`]). Old firmware needs
    /// [`FramingMode::LineDelimited`].
    pub fn framing(mut self, mode: FramingMode) -> Self {
        self.framing = mode;
        self
    }

    /// Open the configured serial port and build the driver.
    pub fn build(self) -> Result<Pdu> {
        let path = self
            .port
            .as_deref()
            .ok_or_else(|| Error::Transport("no serial port configured".into()))?;
        let transport = SerialTransport::open_with_config(path, &self.serial_config)?;
        Ok(Pdu::new(
            Box::new(transport),
            self.read_timeout,
            self.framing,
        ))
    }

    /// Build the driver on an already-open transport.
    ///
    /// Used by tests with a mock transport, and by callers that manage
    /// the port themselves.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> Pdu {
        Pdu::new(transport, self.read_timeout, self.framing)
    }
}

impl Default for PduBuilder {
    fn default() -> Self {
        Self::new()
    }
}

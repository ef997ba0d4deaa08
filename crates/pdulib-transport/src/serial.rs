//! Serial port transport for device communication.
//!
//! This module provides [`SerialTransport`], which implements the
//! [`Transport`] trait for the RS-232/USB serial link to the
//! power-distribution unit.
//!
//! # Example
//!
//! ```no_run
//! use pdulib_transport::SerialTransport;
//! use pdulib_core::transport::Transport;
//! use std::time::Duration;
//!
//! # fn example() -> pdulib_core::Result<()> {
//! // Open the PDU link at its native 19200 baud
//! let mut transport = SerialTransport::open("/dev/ttyUSB0")?;
//!
//! // Send a request
//! transport.send(b"St")?;
//!
//! // Receive reply bytes with a 500 ms timeout
//! let mut buf = [0u8; 16];
//! let n = transport.receive(&mut buf, Duration::from_millis(500))?;
//! # Ok(())
//! # }
//! ```

use std::io::{Read, Write};
use std::time::Duration;

use tracing::debug;

use pdulib_core::error::{Error, Result};
use pdulib_core::transport::Transport;

/// Serial port configuration.
///
/// Defaults match the power-distribution unit's native settings:
/// - 19200 baud
/// - 8 data bits
/// - 1 stop bit
/// - No parity
/// - No flow control
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate (the PDU firmware talks at 19200).
    pub baud_rate: u32,
    /// Number of data bits (typically 8).
    pub data_bits: DataBits,
    /// Number of stop bits (typically 1).
    pub stop_bits: StopBits,
    /// Parity checking (typically None).
    pub parity: Parity,
    /// Flow control (the PDU uses none).
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 19_200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
        }
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// Flow control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

impl From<FlowControl> for serialport::FlowControl {
    fn from(flow: FlowControl) -> Self {
        match flow {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::Software => serialport::FlowControl::Software,
            FlowControl::Hardware => serialport::FlowControl::Hardware,
        }
    }
}

/// A blocking serial [`Transport`] to the power-distribution unit.
///
/// Constructed via [`open`](SerialTransport::open) or
/// [`open_with_config`](SerialTransport::open_with_config). The read
/// timeout is supplied per [`receive`](Transport::receive) call by the
/// driver, not fixed at open time.
pub struct SerialTransport {
    /// The open port, or `None` after `close()`.
    port: Option<Box<dyn serialport::SerialPort>>,
    /// Device node path, kept for log messages.
    path: String,
    /// Timeout currently programmed into the port.
    current_timeout: Duration,
}

impl SerialTransport {
    /// Open a serial port with the default PDU configuration (19200 8N1).
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_config(path, &SerialConfig::default())
    }

    /// Open a serial port with an explicit configuration.
    pub fn open_with_config(path: &str, config: &SerialConfig) -> Result<Self> {
        let initial_timeout = Duration::from_millis(500);
        let port = serialport::new(path, config.baud_rate)
            .data_bits(config.data_bits.into())
            .stop_bits(config.stop_bits.into())
            .parity(config.parity.into())
            .flow_control(config.flow_control.into())
            .timeout(initial_timeout)
            .open()
            .map_err(|e| Error::Transport(format!("open {path}: {e}")))?;

        debug!(path, baud = config.baud_rate, "serial port opened");
        Ok(SerialTransport {
            port: Some(port),
            path: path.to_string(),
            current_timeout: initial_timeout,
        })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;
        port.write_all(data)?;
        port.flush()?;
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;
        if timeout != self.current_timeout {
            port.set_timeout(timeout)
                .map_err(|e| Error::Transport(format!("set timeout: {e}")))?;
            self.current_timeout = timeout;
        }
        match port.read(buf) {
            // Nothing arrived inside the window on either path.
            Ok(0) => Err(Error::Timeout),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(Error::Timeout),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!(path = %self.path, "serial port closed");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

//! Transport implementations for pdulib.
//!
//! This crate provides the concrete implementation of the
//! [`Transport`](pdulib_core::Transport) trait from `pdulib-core` for the
//! physical link to the power-distribution unit:
//!
//! - [`SerialTransport`]: RS-232 and USB virtual COM port connections
//!
//! # Example
//!
//! ```no_run
//! use pdulib_transport::SerialTransport;
//! use pdulib_core::transport::Transport;
//! use std::time::Duration;
//!
//! # fn example() -> pdulib_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0")?;
//!
//! transport.send(b"Bt")?;
//!
//! let mut buf = [0u8; 16];
//! let n = transport.receive(&mut buf, Duration::from_millis(500))?;
//! # Ok(())
//! # }
//! ```

pub mod serial;

pub use serial::{DataBits, FlowControl, Parity, SerialConfig, SerialTransport, StopBits};

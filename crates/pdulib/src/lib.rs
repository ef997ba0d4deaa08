//! # pdulib -- Serial Driver for a Power-Distribution Unit
//!
//! `pdulib` is a blocking Rust driver for a power-distribution unit (PDU)
//! microcontroller attached over an asynchronous serial line. The device
//! answers short ASCII request codes with framed ASCII replies carrying
//! channel measurements, the motor-control subsystem's run state, and the
//! battery charge.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdulib::{Channel, PduBuilder};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut pdu = PduBuilder::new().port("/dev/ttyUSB0").build()?;
//!
//!     let vc = pdu.voltage_current(Channel::Out24Vdc)?;
//!     println!("24VDC rail: {}", vc);
//!
//!     if pdu.run_state()? {
//!         println!("motor-control subsystem is running");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                 | Purpose                                      |
//! |-----------------------|----------------------------------------------|
//! | `pdulib-core`         | [`Transport`] trait, shared types, errors    |
//! | `pdulib-transport`    | Blocking serial transport implementation     |
//! | `pdulib-test-harness` | Mock transport for hardware-free testing     |
//! | **`pdulib`**          | This crate -- protocol codec and driver      |
//!
//! The driver operates on the [`Transport`] trait rather than on a serial
//! port directly, so tests (and unusual deployments) can inject their own
//! byte channel via [`PduBuilder::build_with_transport`].
//!
//! ## Protocol model
//!
//! One request is outstanding at a time: the wire protocol is stateless
//! and cannot disambiguate interleaved requests, so every operation takes
//! `&mut self` and completes (or fails) before the next begins. Replies
//! are delimited by the framing rules in [`protocol`] -- including the
//! zero-byte/`'A'` disambiguation quirk of the current firmware -- and
//! decoded by the pure parsers in [`command`].
//!
//! [`Transport`]: pdulib_core::Transport

pub mod builder;
pub mod command;
pub mod device;
pub mod protocol;

// Re-export the primary types for ergonomic `use pdulib::*`.
pub use builder::PduBuilder;
pub use device::Pdu;
pub use protocol::{FrameStatus, FramingMode};

pub use pdulib_core::error::{Error, Result};
pub use pdulib_core::transport::Transport;
pub use pdulib_core::types::{Channel, VoltageCurrent, NO_BATTERY};

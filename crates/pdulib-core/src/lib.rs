//! pdulib-core: Core traits, types, and error definitions for pdulib.
//!
//! This crate defines the transport-agnostic abstractions the pdulib
//! driver builds on. Applications depend on these types without pulling
//! in a serial-port stack.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`Channel`] -- the device's voltage/current measurement points
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use pdulib_core::*`.
pub use error::{Error, Result};
pub use transport::Transport;
pub use types::*;

//! pdulib-test-harness: Mock transports and test utilities for pdulib.
//!
//! This crate provides [`MockTransport`] for deterministic unit testing
//! of the driver and protocol engine without requiring the real
//! power-distribution hardware.

pub mod mock_serial;

pub use mock_serial::MockTransport;

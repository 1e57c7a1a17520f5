//! Transport implementations for the UC-2000.
//!
//! Provides [`SerialTransport`], the [`Transport`](uc2000_core::Transport)
//! implementation for the controller's RS-232 REMOTE port.

pub mod serial;

pub use serial::{DEFAULT_BAUD_RATE, SerialTransport};

//! Transport trait for controller communication.
//!
//! The [`Transport`] trait abstracts over the physical link to a UC-2000.
//! The shot sequencer and the CLI operate on a `Transport` rather than
//! directly on a serial port, so the same code drives real hardware and the
//! `MockTransport` from the `uc2000-test-harness` crate.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{Error, Result};

/// Line terminator used by [`Transport::read_line`].
pub const LINE_TERMINATOR: u8 = b'\n';

/// Asynchronous byte-level transport to a controller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the controller.
    ///
    /// Implementations should not return until all bytes have been handed
    /// to the underlying link.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the controller into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Waits up to `timeout` for
    /// data to arrive; returns [`Error::Timeout`] if nothing is received
    /// within the deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`].
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;

    /// Read one line from the controller.
    ///
    /// Bytes are collected until a `\n` arrives (included in the result) or
    /// until `timeout` has elapsed in total. Whatever arrived before the
    /// deadline is returned, so a silent controller yields an empty vector
    /// rather than an error. Errors other than [`Error::Timeout`] are
    /// propagated.
    async fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.receive(&mut byte, remaining).await {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == LINE_TERMINATOR {
                        break;
                    }
                }
                Err(Error::Timeout) => break,
                Err(e) => return Err(e),
            }
        }

        tracing::trace!(bytes = line.len(), data = ?line, "read line");
        Ok(line)
    }
}

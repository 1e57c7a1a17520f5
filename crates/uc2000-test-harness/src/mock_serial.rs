//! Mock transport for deterministic testing without a controller.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/reply pairs. Every `send()` is checked against the next
//! expectation and time-stamped, so tests can assert both the exact frames a
//! shot sequence produces and the spacing between them (run under tokio's
//! paused clock to make the spacing exact).
//!
//! # Example
//!
//! ```
//! use uc2000_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // Status request answered with ACK and four status bytes.
//! mock.expect(&[0x7E], &[0xAA, 0x01, 0x00, 0x14, 0x00, 0x55, b'\n']);
//! // Lase on, nothing read back.
//! mock.expect_no_reply(&[0x5B, 0x75]);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

use uc2000_core::error::{Error, Result};
use uc2000_core::transport::Transport;

#[derive(Debug, Clone)]
struct Expectation {
    request: Vec<u8>,
    reply: Vec<u8>,
}

/// A mock [`Transport`] for testing without hardware.
///
/// Expectations are consumed in order. A `send()` that does not match the
/// next expectation, or arrives after the queue is exhausted, fails with
/// [`Error::Transport`]; a mismatch message shows both frames in hex. The
/// refused frame is still logged in [`sent_data`](Self::sent_data).
///
/// The matched reply is served by subsequent `receive()` calls until it is
/// used up, after which `receive()` times out.
#[derive(Debug)]
pub struct MockTransport {
    expectations: VecDeque<Expectation>,
    /// Reply bytes not yet handed out by `receive()`.
    pending_reply: VecDeque<u8>,
    connected: bool,
    sent_log: Vec<Vec<u8>>,
    sent_at: Vec<Instant>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            pending_reply: VecDeque::new(),
            connected: true,
            sent_log: Vec::new(),
            sent_at: Vec::new(),
        }
    }

    /// Expect `request` next and answer it with `reply`.
    pub fn expect(&mut self, request: &[u8], reply: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            reply: reply.to_vec(),
        });
    }

    /// Expect `request` next and answer nothing.
    pub fn expect_no_reply(&mut self, request: &[u8]) {
        self.expect(request, &[]);
    }

    /// Every frame sent so far, one element per `send()` call.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// When each frame in [`sent_data`](Self::sent_data) was sent.
    pub fn send_times(&self) -> &[Instant] {
        &self.sent_at
    }

    /// Gaps between consecutive sends.
    pub fn send_intervals(&self) -> Vec<Duration> {
        self.sent_at.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state.
    ///
    /// When `false`, `send()` and `receive()` fail with
    /// [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.sent_log.push(data.to_vec());
        self.sent_at.push(Instant::now());

        let expectation = self
            .expectations
            .pop_front()
            .ok_or_else(|| Error::Transport("no more expectations in mock transport".into()))?;

        if data != expectation.request.as_slice() {
            return Err(Error::Transport(format!(
                "unexpected send data: expected {:02X?}, got {:02X?}",
                expectation.request, data
            )));
        }

        // A new frame discards whatever the previous reply left unread.
        self.pending_reply = expectation.reply.into();
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        if self.pending_reply.is_empty() {
            return Err(Error::Timeout);
        }

        let n = self.pending_reply.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending_reply.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.pending_reply.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

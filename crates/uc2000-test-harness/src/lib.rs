//! uc2000-test-harness: mock transport for UC-2000 tests.
//!
//! [`MockTransport`] lets the shot sequencer and other transport users be
//! tested deterministically without a controller attached.

pub mod mock_serial;

pub use mock_serial::MockTransport;

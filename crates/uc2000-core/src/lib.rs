//! uc2000-core: error and transport definitions shared by the UC-2000 crates.
//!
//! The protocol encoder, the serial transport, the mock transport and the
//! shot sequencer all depend on these types without depending on each
//! other.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod transport;

pub use error::{Error, Result};
pub use transport::Transport;

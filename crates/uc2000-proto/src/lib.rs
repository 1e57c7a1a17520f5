//! Synrad UC-2000 REMOTE protocol encoder.
//!
//! This crate turns UC-2000 commands into the exact byte sequences the
//! controller expects on its RS-232 port. It provides:
//!
//! - **Carry-less adder** ([`nocarry`]) -- the digit-wise decimal addition
//!   used by the percent-message checksum.
//! - **Command catalog** ([`catalog`]) -- typed setup, mode and lase
//!   commands and their command bytes.
//! - **Message encoder** ([`message`]) -- framing, data bytes and checksums
//!   for every message shape, by name or from typed commands.
//!
//! All functions are pure. The caller is responsible for sending the bytes
//! over a transport.
//!
//! # Example
//!
//! ```
//! use uc2000_proto::{encode, Command, Value};
//! use uc2000_proto::catalog::{OperatingMode, Setting};
//!
//! // By name, as a script or command line would.
//! let bytes = encode("mode", &Value::from("anv"), true).unwrap();
//! assert_eq!(bytes, vec![0x5B, 0x72, 0x8D]);
//!
//! // The same message from the typed command.
//! let typed = Command::Setting(Setting::Mode(OperatingMode::Anv)).encode(true);
//! assert_eq!(typed, bytes);
//! ```

pub mod catalog;
pub mod message;
pub mod nocarry;
pub mod value;

pub use catalog::{Family, Setting};
pub use message::{Command, PercentPower, encode};
pub use nocarry::add_no_carry;
pub use value::Value;

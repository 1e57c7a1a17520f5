//! # uc2000 -- Synrad UC-2000 laser controller control
//!
//! Drives a Synrad UC-2000 in REMOTE mode over its RS-232 port: encodes
//! setup, mode, power and lase commands into the controller's binary
//! protocol and runs timed fire/stop shot sequences.
//!
//! ## Architecture
//!
//! | Crate                 | Purpose                                         |
//! |-----------------------|-------------------------------------------------|
//! | `uc2000-core`         | [`Transport`] trait, [`Error`], [`Result`]      |
//! | `uc2000-proto`        | Message encoder, command catalog, carry-less adder |
//! | `uc2000-transport`    | Serial port transport                           |
//! | `uc2000-test-harness` | Mock transport for tests                        |
//! | **`uc2000`**          | This crate -- shot sequencing, re-exports       |
//!
//! ## Firing a sequence
//!
//! ```no_run
//! use std::time::Duration;
//! use uc2000::{SerialTransport, ShotConfig, ShotSequencer};
//!
//! # async fn example() -> uc2000::Result<()> {
//! let transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//! let config = ShotConfig::default()
//!     .power(10.0)
//!     .shot_time(Duration::from_millis(500))
//!     .delay(Duration::from_millis(500))
//!     .shots(2);
//!
//! let mut sequencer = ShotSequencer::new(transport, config)?;
//! let report = sequencer.run().await?;
//! println!("fired {} shots", report.shots_fired);
//! # Ok(())
//! # }
//! ```
//!
//! ## Encoding only
//!
//! ```
//! use uc2000::{encode, Value};
//!
//! let bytes = encode("percent", &Value::Int(10), true)?;
//! assert_eq!(bytes, vec![0x5B, 0x7F, 20, 0x76]);
//! # Ok::<(), uc2000::Error>(())
//! ```
//!
//! The UC-2000 must be in REMOTE mode to accept any of these messages.

pub mod config;
pub mod sequencer;

pub use uc2000_core::{Error, Result, Transport};
pub use uc2000_proto as proto;
pub use uc2000_proto::{Command, Family, PercentPower, Setting, Value, add_no_carry, encode};
pub use uc2000_transport::{DEFAULT_BAUD_RATE, SerialTransport};

pub use config::ShotConfig;
pub use sequencer::{Frame, SequenceReport, ShotSequencer, Step, plan};

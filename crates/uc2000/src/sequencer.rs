//! Timed fire/stop sequencing.
//!
//! A shot sequence polls the controller's status, sets the output power
//! once, then raises and drops the command signal for each shot:
//!
//! ```text
//! 0x7E                          status request, one line read back
//! 0x5B 0x7F <2*power>           set power (no checksum)
//! repeat N times:
//!   wait <delay>                (not before the first shot)
//!   0x5B 0x75                   lase on (no checksum)
//!   wait <shot_time>
//!   0x5B 0x76 0x89              lase off (with checksum)
//! ```
//!
//! The sequence is first laid out as a list of [`Step`]s by [`plan`], which
//! makes it printable as a dry run, and then executed step by step against a
//! [`Transport`].

use std::fmt;
use std::time::Duration;

use uc2000_core::{Result, Transport};
use uc2000_proto::message::{cmd_lase, cmd_set_percent, cmd_status_request};

use crate::config::ShotConfig;

/// The frames a shot sequence sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    StatusRequest,
    SetPower,
    LaseOn,
    LaseOff,
}

impl Frame {
    pub fn label(self) -> &'static str {
        match self {
            Frame::StatusRequest => "status request",
            Frame::SetPower => "set power",
            Frame::LaseOn => "lase on",
            Frame::LaseOff => "lase off",
        }
    }
}

/// One action of a shot sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Write a frame to the controller.
    Send { frame: Frame, bytes: Vec<u8> },
    /// Read one line of reply.
    ReadReply { timeout: Duration },
    /// Sleep.
    Wait(Duration),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Send { frame, bytes } => {
                write!(f, "send {:<14}", frame.label())?;
                for byte in bytes {
                    write!(f, " {byte:02X}")?;
                }
                Ok(())
            }
            Step::ReadReply { timeout } => write!(f, "read reply (timeout {timeout:?})"),
            Step::Wait(d) => write!(f, "wait {d:?}"),
        }
    }
}

/// Lay out the steps of a shot sequence.
///
/// Zero-length waits are left out. Fails when the configuration does not
/// validate.
pub fn plan(config: &ShotConfig) -> Result<Vec<Step>> {
    config.validate()?;

    let mut steps = vec![
        Step::Send {
            frame: Frame::StatusRequest,
            bytes: cmd_status_request(),
        },
        Step::ReadReply {
            timeout: config.read_timeout,
        },
        Step::Send {
            frame: Frame::SetPower,
            bytes: cmd_set_percent(config.power_percent, false)?,
        },
    ];

    for shot in 0..config.num_shots {
        if shot > 0 && !config.delay.is_zero() {
            steps.push(Step::Wait(config.delay));
        }
        steps.push(Step::Send {
            frame: Frame::LaseOn,
            bytes: cmd_lase(true, false),
        });
        if !config.shot_time.is_zero() {
            steps.push(Step::Wait(config.shot_time));
        }
        steps.push(Step::Send {
            frame: Frame::LaseOff,
            bytes: cmd_lase(false, true),
        });
    }

    Ok(steps)
}

/// What a completed sequence observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceReport {
    /// Raw status reply, undecoded. Empty if the controller stayed silent.
    pub status_reply: Vec<u8>,
    /// Number of lase-off frames sent.
    pub shots_fired: u32,
}

/// Runs shot sequences over a transport.
pub struct ShotSequencer<T: Transport> {
    transport: T,
    config: ShotConfig,
}

impl<T: Transport> ShotSequencer<T> {
    /// Wrap `transport`. Fails if `config` does not validate.
    pub fn new(transport: T, config: ShotConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &ShotConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// The steps [`run`](Self::run) will execute.
    pub fn plan(&self) -> Result<Vec<Step>> {
        plan(&self.config)
    }

    /// Execute the sequence.
    ///
    /// Stops at the first transport error; the laser may then be left
    /// lasing, and it is up to the caller to send a lase-off.
    pub async fn run(&mut self) -> Result<SequenceReport> {
        let steps = self.plan()?;
        let mut report = SequenceReport::default();

        tracing::info!(
            power = self.config.power_percent,
            shots = self.config.num_shots,
            shot_time_ms = self.config.shot_time.as_millis(),
            delay_ms = self.config.delay.as_millis(),
            "Starting shot sequence"
        );

        for step in steps {
            match step {
                Step::Send { frame, bytes } => {
                    tracing::debug!(frame = frame.label(), bytes = ?bytes, "send");
                    self.transport.send(&bytes).await?;
                    if frame == Frame::LaseOff {
                        report.shots_fired += 1;
                        tracing::info!(shot = report.shots_fired, "Shot complete");
                    }
                }
                Step::ReadReply { timeout } => {
                    report.status_reply = self.transport.read_line(timeout).await?;
                    tracing::info!(reply = ?report.status_reply, "Controller status");
                }
                Step::Wait(d) => tokio::time::sleep(d).await,
            }
        }

        Ok(report)
    }
}

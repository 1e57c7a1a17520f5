//! Shot sequence configuration.
//!
//! [`ShotConfig`] holds everything the [`ShotSequencer`](crate::ShotSequencer)
//! needs besides the transport: output power, shot timing, the number of
//! shots and how long to wait for the status reply.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use uc2000::ShotConfig;
//!
//! let config = ShotConfig::default()
//!     .power(25.0)
//!     .shot_time(Duration::from_millis(200))
//!     .delay(Duration::from_secs(1))
//!     .shots(5);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use uc2000_core::{Error, Result};

/// Timing and power for a sequence of shots.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotConfig {
    /// Output power in percent, 0-100.
    pub power_percent: f64,
    /// How long the command signal stays on per shot.
    pub shot_time: Duration,
    /// Pause between the end of one shot and the start of the next.
    pub delay: Duration,
    /// Number of shots to fire.
    pub num_shots: u32,
    /// How long to wait for the status request reply.
    pub read_timeout: Duration,
}

impl Default for ShotConfig {
    fn default() -> Self {
        ShotConfig {
            power_percent: 10.0,
            shot_time: Duration::from_millis(500),
            delay: Duration::from_millis(500),
            num_shots: 2,
            read_timeout: Duration::from_millis(50),
        }
    }
}

impl ShotConfig {
    pub fn power(mut self, percent: f64) -> Self {
        self.power_percent = percent;
        self
    }

    pub fn shot_time(mut self, shot_time: Duration) -> Self {
        self.shot_time = shot_time;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shots(mut self, n: u32) -> Self {
        self.num_shots = n;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Check the configuration before anything is sent.
    ///
    /// Power must be a finite percentage in 0-100. Zero shots is allowed
    /// (the sequence then only sets the power).
    pub fn validate(&self) -> Result<()> {
        if !self.power_percent.is_finite() || !(0.0..=100.0).contains(&self.power_percent) {
            return Err(Error::InvalidParameter(format!(
                "power {} % outside 0-100",
                self.power_percent
            )));
        }
        Ok(())
    }
}

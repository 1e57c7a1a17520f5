//! UC-2000 REMOTE message encoder.
//!
//! The UC-2000 accepts single-byte commands over RS-232 while in REMOTE
//! mode. Four message shapes exist:
//!
//! ```text
//! setup / mode / lase:  STX <cmd> [<checksum>]
//! percent (PWM / SET):  STX 0x7F <data> [<checksum>]
//! status request:       0x7E
//! ```
//!
//! - `STX` is the start byte `0x5B`. The status request is sent on its own
//!   without it.
//! - The setup/mode/lase checksum is the ones' complement of the command
//!   byte.
//! - The percent data byte is the percentage doubled (half-percent steps)
//!   and truncated. Its checksum is the ones' complement of the carry-less
//!   sum of the command byte and the percentage.
//!
//! The controller replies [`ACK`] or [`NAK`] to every framed message. A NAK
//! is sent when no valid command or checksum byte follows `STX` within one
//! second, or when the checksum is wrong. Replies are not decoded here.

use bytes::{BufMut, BytesMut};
use uc2000_core::{Error, Result};

use crate::catalog::{Family, Setting};
use crate::nocarry::add_no_carry;
use crate::value::Value;

/// Start-of-transmission byte opening every framed message.
pub const START_BYTE: u8 = 0x5B;

/// Stand-alone status request byte.
pub const STATUS_REQUEST_BYTE: u8 = 0x7E;

/// Command byte of the percent (PWM, or closed-loop SET) message.
pub const SET_PERCENT_BYTE: u8 = 0x7F;

/// Positive acknowledgement from the controller.
pub const ACK: u8 = 0xAA;

/// Negative acknowledgement from the controller.
pub const NAK: u8 = 0x3F;

/// Command name of the percent message.
pub const PERCENT: &str = "percent";

/// Command name of the status request.
pub const STATUS_REQUEST: &str = "status_request";

/// A percentage that fits the percent message's single data byte.
///
/// The data byte counts half-percent steps, so the largest encodable value
/// is just under 128 %. The controller itself only honours 0-100 %.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PercentPower(f64);

impl PercentPower {
    /// Validate a percentage.
    ///
    /// Fails with [`Error::InvalidData`] when `percent` is not finite, is
    /// negative, or doubles to more than one byte.
    pub fn new(percent: f64) -> Result<Self> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(Error::InvalidData(format!(
                "percent must be a non-negative number, got {percent}"
            )));
        }
        if (2.0 * percent).trunc() > f64::from(u8::MAX) {
            return Err(Error::InvalidData(format!(
                "percent {percent} does not fit the data byte (max 127.5)"
            )));
        }
        Ok(Self(percent))
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    /// The data byte: the percentage in half-percent steps, truncated.
    pub fn data_byte(self) -> u8 {
        (2.0 * self.0).trunc() as u8
    }

    /// The whole-percent part the checksum is computed from.
    fn whole_percent(self) -> u64 {
        self.0.trunc() as u64
    }
}

/// A UC-2000 command with its data, ready to be framed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// A setup, mode or lase command from the catalog.
    Setting(Setting),
    /// Set the PWM duty cycle (or the closed-loop set point).
    Percent(PercentPower),
    /// Ask the controller to report its status.
    StatusRequest,
}

impl Command {
    /// Resolve a command name and its data.
    ///
    /// Fails with [`Error::UnrecognizedCommand`] for an unknown name and with
    /// [`Error::InvalidData`] when `data` is not legal for the command.
    /// `data` is ignored for `status_request`.
    pub fn resolve(command: &str, data: &Value) -> Result<Self> {
        match command {
            PERCENT => {
                let percent = data.as_number().ok_or_else(|| {
                    Error::InvalidData(format!("percent needs a number, got {data}"))
                })?;
                Ok(Command::Percent(PercentPower::new(percent)?))
            }
            STATUS_REQUEST => Ok(Command::StatusRequest),
            name => {
                let family: Family = name.parse()?;
                Ok(Command::Setting(family.resolve(data)?))
            }
        }
    }

    /// The command name this command is known by on the wire vocabulary.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Setting(setting) => setting.family().name(),
            Command::Percent(_) => PERCENT,
            Command::StatusRequest => STATUS_REQUEST,
        }
    }

    /// Encode into the exact byte sequence to transmit.
    ///
    /// `checksum` appends the checksum byte to framed messages; the status
    /// request ignores it.
    pub fn encode(&self, checksum: bool) -> Vec<u8> {
        match *self {
            Command::Setting(setting) => {
                let command_byte = setting.command_byte();
                let checksum_byte = checksum.then(|| !command_byte);
                frame(command_byte, None, checksum_byte)
            }
            Command::Percent(power) => {
                // The checksum covers the raw percentage, not the doubled
                // data byte.
                let checksum_byte = checksum.then(|| {
                    let sum = add_no_carry(&[u64::from(SET_PERCENT_BYTE), power.whole_percent()]);
                    !(sum as u8)
                });
                frame(SET_PERCENT_BYTE, Some(power.data_byte()), checksum_byte)
            }
            Command::StatusRequest => vec![STATUS_REQUEST_BYTE],
        }
    }
}

impl From<Setting> for Command {
    fn from(setting: Setting) -> Self {
        Command::Setting(setting)
    }
}

/// Assemble `STX <cmd> [<data>] [<checksum>]`.
fn frame(command_byte: u8, data_byte: Option<u8>, checksum_byte: Option<u8>) -> Vec<u8> {
    let capacity = 2 + data_byte.is_some() as usize + checksum_byte.is_some() as usize;
    let mut buf = BytesMut::with_capacity(capacity);
    buf.put_u8(START_BYTE);
    buf.put_u8(command_byte);
    if let Some(data) = data_byte {
        buf.put_u8(data);
    }
    if let Some(checksum) = checksum_byte {
        buf.put_u8(checksum);
    }
    buf.to_vec()
}

/// Encode a named command and its data into the byte sequence to transmit.
///
/// # Example
///
/// ```
/// use uc2000_proto::{encode, Value};
///
/// assert_eq!(encode("percent", &Value::Int(10), false).unwrap(), vec![0x5B, 0x7F, 20]);
/// assert_eq!(encode("lase", &Value::Bool(true), false).unwrap(), vec![0x5B, 0x75]);
/// assert_eq!(encode("status_request", &Value::None, true).unwrap(), vec![0x7E]);
/// ```
pub fn encode(command: &str, data: &Value, checksum: bool) -> Result<Vec<u8>> {
    let bytes = Command::resolve(command, data)?.encode(checksum);
    tracing::trace!(command, %data, checksum, bytes = ?bytes, "encoded message");
    Ok(bytes)
}

// ---------------------------------------------------------------
// Command builders
// ---------------------------------------------------------------

/// Build the status request (`0x7E`).
pub fn cmd_status_request() -> Vec<u8> {
    Command::StatusRequest.encode(false)
}

/// Build a percent command for `percent` %.
pub fn cmd_set_percent(percent: f64, checksum: bool) -> Result<Vec<u8>> {
    Ok(Command::Percent(PercentPower::new(percent)?).encode(checksum))
}

/// Build a lase command: `true` raises the command signal, `false` drops it.
pub fn cmd_lase(on: bool, checksum: bool) -> Vec<u8> {
    Command::Setting(Setting::Lase(on)).encode(checksum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GateLogic, MaxPwm, OperatingMode, PwmFrequency};

    fn all_settings() -> Vec<Setting> {
        Family::ALL
            .into_iter()
            .flat_map(|family| {
                family
                    .keys()
                    .iter()
                    .map(move |k| family.resolve(&Value::parse(k)).unwrap())
            })
            .collect()
    }

    // ---------------------------------------------------------------
    // Catalog commands
    // ---------------------------------------------------------------

    #[test]
    fn catalog_without_checksum() {
        for setting in all_settings() {
            let bytes = Command::from(setting).encode(false);
            assert_eq!(bytes, vec![START_BYTE, setting.command_byte()], "{setting:?}");
        }
    }

    #[test]
    fn catalog_with_checksum() {
        for setting in all_settings() {
            let cmd = setting.command_byte();
            let bytes = Command::from(setting).encode(true);
            assert_eq!(bytes, vec![START_BYTE, cmd, !cmd], "{setting:?}");
        }
    }

    #[test]
    fn lase_frames() {
        assert_eq!(cmd_lase(true, false), vec![0x5B, 0x75]);
        assert_eq!(cmd_lase(false, true), vec![0x5B, 0x76, 0x89]);
    }

    #[test]
    fn named_catalog_commands() {
        assert_eq!(encode("pwm_freq", &Value::Int(20), true).unwrap(), vec![0x5B, 0x7A, 0x85]);
        assert_eq!(encode("gate_logic", &"down".into(), false).unwrap(), vec![0x5B, 0x7B]);
        assert_eq!(encode("max_pwm", &Value::Int(95), true).unwrap(), vec![0x5B, 0x7C, 0x83]);
        assert_eq!(encode("lase_on_power_up", &true.into(), true).unwrap(), vec![0x5B, 0x30, 0xCF]);
        assert_eq!(encode("mode", &"anv_closed".into(), false).unwrap(), vec![0x5B, 0x74]);
    }

    #[test]
    fn typed_and_named_agree() {
        let pairs = [
            (Setting::PwmFreq(PwmFrequency::Khz10), "pwm_freq", Value::Int(10)),
            (Setting::GateLogic(GateLogic::Up), "gate_logic", Value::from("up")),
            (Setting::MaxPwm(MaxPwm::Percent99), "max_pwm", Value::Int(99)),
            (Setting::Mode(OperatingMode::ManualClosed), "mode", Value::from("man_closed")),
        ];
        for (setting, name, data) in pairs {
            assert_eq!(Command::resolve(name, &data).unwrap(), Command::Setting(setting));
            assert_eq!(Command::Setting(setting).name(), name);
        }
    }

    // ---------------------------------------------------------------
    // Percent command
    // ---------------------------------------------------------------

    #[test]
    fn percent_without_checksum() {
        assert_eq!(encode("percent", &Value::Int(10), false).unwrap(), vec![0x5B, 0x7F, 20]);
        assert_eq!(encode("percent", &Value::Int(0), false).unwrap(), vec![0x5B, 0x7F, 0]);
        assert_eq!(encode("percent", &Value::Int(100), false).unwrap(), vec![0x5B, 0x7F, 200]);
    }

    #[test]
    fn percent_with_checksum_covers_raw_percentage() {
        // add_no_carry(127, 10) = 137, !137 = 118
        assert_eq!(add_no_carry(&[127, 10]), 137);
        assert_eq!(
            encode("percent", &Value::Int(10), true).unwrap(),
            vec![0x5B, 0x7F, 20, 0x76]
        );
        // add_no_carry(127, 50) = 177, !177 = 78
        assert_eq!(cmd_set_percent(50.0, true).unwrap(), vec![0x5B, 0x7F, 100, 78]);
        // add_no_carry(127, 0) = 127, !127 = 128
        assert_eq!(cmd_set_percent(0.0, true).unwrap(), vec![0x5B, 0x7F, 0, 0x80]);
    }

    #[test]
    fn percent_data_byte_truncates() {
        // 2 * 12.75 = 25.5 -> 25
        assert_eq!(cmd_set_percent(12.75, false).unwrap(), vec![0x5B, 0x7F, 25]);
        // 2 * 12.5 = 25 exactly
        assert_eq!(cmd_set_percent(12.5, false).unwrap(), vec![0x5B, 0x7F, 25]);
        // 2 * 127.5 = 255, the last value that fits
        assert_eq!(cmd_set_percent(127.5, false).unwrap(), vec![0x5B, 0x7F, 255]);
        assert_eq!(cmd_set_percent(127.9, false).unwrap(), vec![0x5B, 0x7F, 255]);
    }

    #[test]
    fn percent_checksum_uses_whole_percent() {
        // 12.75 % checksums like 12 %: add_no_carry(127, 12) = 139, !139 = 116
        assert_eq!(cmd_set_percent(12.75, true).unwrap(), vec![0x5B, 0x7F, 25, 116]);
    }

    #[test]
    fn percent_accepts_numeric_text() {
        assert_eq!(encode("percent", &"25".into(), false).unwrap(), vec![0x5B, 0x7F, 50]);
    }

    #[test]
    fn percent_rejects_non_numbers() {
        for data in [Value::from("ten"), Value::Bool(true), Value::None] {
            let err = encode("percent", &data, false).unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)), "{data}");
        }
    }

    #[test]
    fn percent_rejects_values_outside_the_data_byte() {
        for percent in [-1.0, 128.0, 1000.0, f64::NAN, f64::INFINITY] {
            let err = cmd_set_percent(percent, false).unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)), "{percent}");
        }
    }

    // ---------------------------------------------------------------
    // Status request and errors
    // ---------------------------------------------------------------

    #[test]
    fn status_request_ignores_data_and_checksum() {
        let data = [Value::None, Value::Int(3), Value::from("x"), Value::Bool(false)];
        for d in &data {
            for checksum in [false, true] {
                assert_eq!(encode("status_request", d, checksum).unwrap(), vec![0x7E]);
            }
        }
        assert_eq!(cmd_status_request(), vec![STATUS_REQUEST_BYTE]);
    }

    #[test]
    fn unknown_command_is_unrecognized() {
        let err = encode("nonexistent", &Value::Int(1), false).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedCommand(ref s) if s == "nonexistent"));
    }

    #[test]
    fn bad_catalog_key_is_invalid_data() {
        let err = encode("mode", &"invalid_key".into(), false).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn frame_lengths() {
        let cases: [(&str, Value, usize, usize); 8] = [
            ("pwm_freq", Value::Int(5), 2, 3),
            ("gate_logic", "up".into(), 2, 3),
            ("max_pwm", Value::Int(99), 2, 3),
            ("lase_on_power_up", false.into(), 2, 3),
            ("mode", "anc".into(), 2, 3),
            ("lase", true.into(), 2, 3),
            ("percent", Value::Float(42.0), 3, 4),
            ("status_request", Value::None, 1, 1),
        ];
        for (name, data, plain, with_checksum) in cases {
            assert_eq!(encode(name, &data, false).unwrap().len(), plain, "{name}");
            assert_eq!(encode(name, &data, true).unwrap().len(), with_checksum, "{name}");
        }
    }

    #[test]
    fn encoding_is_repeatable() {
        let first = encode("percent", &Value::Float(33.3), true).unwrap();
        for _ in 0..10 {
            assert_eq!(encode("percent", &Value::Float(33.3), true).unwrap(), first);
        }
    }
}

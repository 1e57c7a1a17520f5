//! UC-2000 REMOTE command catalog.
//!
//! Setup, mode and lase commands have no data byte: the data value selects
//! one of a fixed set of command bytes. Each command family is modelled by
//! its own key type so that an illegal (family, value) pair cannot be
//! constructed, and [`Family::resolve`] maps a loosely-typed [`Value`] onto
//! those key types for name-driven callers.
//!
//! | family | key | byte |
//! |---|---|---|
//! | `pwm_freq` | 5 / 10 / 20 kHz | `0x77` / `0x78` / `0x7A` |
//! | `gate_logic` | up / down | `0x7A` / `0x7B` |
//! | `max_pwm` | 95 / 99 % | `0x7C` / `0x7D` |
//! | `lase_on_power_up` | true / false | `0x30` / `0x31` |
//! | `mode` | manual / anc / anv / man_closed / anv_closed | `0x70`..`0x74` |
//! | `lase` | true / false | `0x75` / `0x76` |

use std::fmt;
use std::str::FromStr;

use uc2000_core::{Error, Result};

use crate::value::Value;

// ---------------------------------------------------------------
// Command bytes
// ---------------------------------------------------------------

const PWM_FREQ_5_KHZ: u8 = 0x77;
const PWM_FREQ_10_KHZ: u8 = 0x78;
const PWM_FREQ_20_KHZ: u8 = 0x7A;

const GATE_LOGIC_UP: u8 = 0x7A;
const GATE_LOGIC_DOWN: u8 = 0x7B;

const MAX_PWM_95: u8 = 0x7C;
const MAX_PWM_99: u8 = 0x7D;

/// Lase-on-power-up enabled.
const LASE_ON_POWER_UP_ON: u8 = 0x30;
/// Lase-on-power-up disabled.
const LASE_ON_POWER_UP_OFF: u8 = 0x31;

const MODE_MANUAL: u8 = 0x70;
const MODE_ANC: u8 = 0x71;
const MODE_ANV: u8 = 0x72;
const MODE_MANUAL_CLOSED: u8 = 0x73;
const MODE_ANV_CLOSED: u8 = 0x74;

/// Command signal on.
const LASE_ON: u8 = 0x75;
/// Command signal off.
const LASE_OFF: u8 = 0x76;

// ---------------------------------------------------------------
// Families
// ---------------------------------------------------------------

/// A catalog command family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    PwmFreq,
    GateLogic,
    MaxPwm,
    LaseOnPowerUp,
    Mode,
    Lase,
}

impl Family {
    /// Every catalog family, in protocol-manual order.
    pub const ALL: [Family; 6] = [
        Family::PwmFreq,
        Family::GateLogic,
        Family::MaxPwm,
        Family::LaseOnPowerUp,
        Family::Mode,
        Family::Lase,
    ];

    /// The family's command name.
    pub fn name(self) -> &'static str {
        match self {
            Family::PwmFreq => "pwm_freq",
            Family::GateLogic => "gate_logic",
            Family::MaxPwm => "max_pwm",
            Family::LaseOnPowerUp => "lase_on_power_up",
            Family::Mode => "mode",
            Family::Lase => "lase",
        }
    }

    /// The legal data keys of this family, as they are written on the
    /// command line.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Family::PwmFreq => &["5", "10", "20"],
            Family::GateLogic => &["up", "down"],
            Family::MaxPwm => &["95", "99"],
            Family::LaseOnPowerUp | Family::Lase => &["true", "false"],
            Family::Mode => &["manual", "anc", "anv", "man_closed", "anv_closed"],
        }
    }

    /// Resolve `data` to a concrete [`Setting`] of this family.
    ///
    /// Numeric families take integers (an integral float such as `5.0` is
    /// accepted), boolean families take booleans and text families take
    /// their exact lowercase key. Anything else is [`Error::InvalidData`].
    pub fn resolve(self, data: &Value) -> Result<Setting> {
        let setting = match self {
            Family::PwmFreq => data
                .as_integer()
                .and_then(PwmFrequency::from_khz)
                .map(Setting::PwmFreq),
            Family::MaxPwm => data
                .as_integer()
                .and_then(MaxPwm::from_percent)
                .map(Setting::MaxPwm),
            Family::GateLogic => match data {
                Value::Text(s) => s.parse::<GateLogic>().ok().map(Setting::GateLogic),
                _ => None,
            },
            Family::Mode => match data {
                Value::Text(s) => s.parse::<OperatingMode>().ok().map(Setting::Mode),
                _ => None,
            },
            Family::LaseOnPowerUp => match data {
                Value::Bool(b) => Some(Setting::LaseOnPowerUp(*b)),
                _ => None,
            },
            Family::Lase => match data {
                Value::Bool(b) => Some(Setting::Lase(*b)),
                _ => None,
            },
        };

        setting.ok_or_else(|| {
            Error::InvalidData(format!(
                "{data} is not a {} key (expected one of: {})",
                self.name(),
                self.keys().join(", ")
            ))
        })
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Family::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| Error::UnrecognizedCommand(s.to_string()))
    }
}

// ---------------------------------------------------------------
// Keys
// ---------------------------------------------------------------

/// PWM carrier frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PwmFrequency {
    Khz5,
    Khz10,
    Khz20,
}

impl PwmFrequency {
    /// Map a frequency in kHz to the supported setting.
    pub fn from_khz(khz: i64) -> Option<Self> {
        match khz {
            5 => Some(PwmFrequency::Khz5),
            10 => Some(PwmFrequency::Khz10),
            20 => Some(PwmFrequency::Khz20),
            _ => None,
        }
    }

    pub fn command_byte(self) -> u8 {
        match self {
            PwmFrequency::Khz5 => PWM_FREQ_5_KHZ,
            PwmFrequency::Khz10 => PWM_FREQ_10_KHZ,
            PwmFrequency::Khz20 => PWM_FREQ_20_KHZ,
        }
    }
}

/// Gate input logic polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateLogic {
    Up,
    Down,
}

impl GateLogic {
    pub fn command_byte(self) -> u8 {
        match self {
            GateLogic::Up => GATE_LOGIC_UP,
            GateLogic::Down => GATE_LOGIC_DOWN,
        }
    }
}

impl FromStr for GateLogic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(GateLogic::Up),
            "down" => Ok(GateLogic::Down),
            _ => Err(Error::InvalidData(format!("unknown gate logic: {s}"))),
        }
    }
}

/// Maximum PWM duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxPwm {
    Percent95,
    Percent99,
}

impl MaxPwm {
    pub fn from_percent(percent: i64) -> Option<Self> {
        match percent {
            95 => Some(MaxPwm::Percent95),
            99 => Some(MaxPwm::Percent99),
            _ => None,
        }
    }

    pub fn command_byte(self) -> u8 {
        match self {
            MaxPwm::Percent95 => MAX_PWM_95,
            MaxPwm::Percent99 => MAX_PWM_99,
        }
    }
}

/// Controller operating mode.
///
/// The closed-loop modes interpret the percent command as a set point
/// rather than a PWM duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    Manual,
    /// Analog current.
    Anc,
    /// Analog voltage.
    Anv,
    ManualClosed,
    AnvClosed,
}

impl OperatingMode {
    pub fn name(self) -> &'static str {
        match self {
            OperatingMode::Manual => "manual",
            OperatingMode::Anc => "anc",
            OperatingMode::Anv => "anv",
            OperatingMode::ManualClosed => "man_closed",
            OperatingMode::AnvClosed => "anv_closed",
        }
    }

    pub fn command_byte(self) -> u8 {
        match self {
            OperatingMode::Manual => MODE_MANUAL,
            OperatingMode::Anc => MODE_ANC,
            OperatingMode::Anv => MODE_ANV,
            OperatingMode::ManualClosed => MODE_MANUAL_CLOSED,
            OperatingMode::AnvClosed => MODE_ANV_CLOSED,
        }
    }
}

impl FromStr for OperatingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "manual" => Ok(OperatingMode::Manual),
            "anc" => Ok(OperatingMode::Anc),
            "anv" => Ok(OperatingMode::Anv),
            "man_closed" => Ok(OperatingMode::ManualClosed),
            "anv_closed" => Ok(OperatingMode::AnvClosed),
            _ => Err(Error::InvalidData(format!("unknown mode: {s}"))),
        }
    }
}

// ---------------------------------------------------------------
// Settings
// ---------------------------------------------------------------

/// One fully-resolved catalog entry: a family together with its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    PwmFreq(PwmFrequency),
    GateLogic(GateLogic),
    MaxPwm(MaxPwm),
    LaseOnPowerUp(bool),
    Mode(OperatingMode),
    Lase(bool),
}

impl Setting {
    pub fn family(self) -> Family {
        match self {
            Setting::PwmFreq(_) => Family::PwmFreq,
            Setting::GateLogic(_) => Family::GateLogic,
            Setting::MaxPwm(_) => Family::MaxPwm,
            Setting::LaseOnPowerUp(_) => Family::LaseOnPowerUp,
            Setting::Mode(_) => Family::Mode,
            Setting::Lase(_) => Family::Lase,
        }
    }

    /// The single command byte this entry is sent as.
    pub fn command_byte(self) -> u8 {
        match self {
            Setting::PwmFreq(f) => f.command_byte(),
            Setting::GateLogic(g) => g.command_byte(),
            Setting::MaxPwm(m) => m.command_byte(),
            Setting::LaseOnPowerUp(true) => LASE_ON_POWER_UP_ON,
            Setting::LaseOnPowerUp(false) => LASE_ON_POWER_UP_OFF,
            Setting::Mode(m) => m.command_byte(),
            Setting::Lase(true) => LASE_ON,
            Setting::Lase(false) => LASE_OFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte(family: &str, data: Value) -> u8 {
        family
            .parse::<Family>()
            .unwrap()
            .resolve(&data)
            .unwrap()
            .command_byte()
    }

    #[test]
    fn pwm_freq_bytes() {
        assert_eq!(byte("pwm_freq", Value::Int(5)), 0x77);
        assert_eq!(byte("pwm_freq", Value::Int(10)), 0x78);
        assert_eq!(byte("pwm_freq", Value::Int(20)), 0x7A);
        assert_eq!(byte("pwm_freq", Value::Float(20.0)), 0x7A);
    }

    #[test]
    fn gate_logic_bytes() {
        assert_eq!(byte("gate_logic", "up".into()), 0x7A);
        assert_eq!(byte("gate_logic", "down".into()), 0x7B);
    }

    #[test]
    fn max_pwm_bytes() {
        assert_eq!(byte("max_pwm", Value::Int(95)), 0x7C);
        assert_eq!(byte("max_pwm", Value::Int(99)), 0x7D);
    }

    #[test]
    fn boolean_family_bytes() {
        assert_eq!(byte("lase_on_power_up", true.into()), 0x30);
        assert_eq!(byte("lase_on_power_up", false.into()), 0x31);
        assert_eq!(byte("lase", true.into()), 0x75);
        assert_eq!(byte("lase", false.into()), 0x76);
    }

    #[test]
    fn mode_bytes() {
        assert_eq!(byte("mode", "manual".into()), 0x70);
        assert_eq!(byte("mode", "anc".into()), 0x71);
        assert_eq!(byte("mode", "anv".into()), 0x72);
        assert_eq!(byte("mode", "man_closed".into()), 0x73);
        assert_eq!(byte("mode", "anv_closed".into()), 0x74);
    }

    #[test]
    fn every_listed_key_resolves() {
        for family in Family::ALL {
            for key in family.keys() {
                let setting = family.resolve(&Value::parse(key)).unwrap();
                assert_eq!(setting.family(), family, "{family} {key}");
            }
        }
    }

    #[test]
    fn family_names_round_trip() {
        for family in Family::ALL {
            assert_eq!(family.name().parse::<Family>().unwrap(), family);
        }
    }

    #[test]
    fn unknown_family_is_unrecognized() {
        let err = "percent_power".parse::<Family>().unwrap_err();
        assert!(matches!(err, Error::UnrecognizedCommand(ref s) if s == "percent_power"));
    }

    #[test]
    fn illegal_keys_are_invalid_data() {
        let cases = [
            (Family::PwmFreq, Value::Int(15)),
            (Family::PwmFreq, Value::Float(5.5)),
            (Family::PwmFreq, Value::Text("5".into())),
            (Family::MaxPwm, Value::Int(100)),
            (Family::GateLogic, Value::Text("UP".into())),
            (Family::GateLogic, Value::Bool(true)),
            (Family::Mode, Value::Text("invalid_key".into())),
            (Family::Lase, Value::Int(1)),
            (Family::LaseOnPowerUp, Value::None),
        ];
        for (family, data) in cases {
            let err = family.resolve(&data).unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)), "{family} {data}");
        }
    }

    #[test]
    fn invalid_data_message_lists_keys() {
        let err = Family::Mode.resolve(&"turbo".into()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid data: \"turbo\" is not a mode key \
             (expected one of: manual, anc, anv, man_closed, anv_closed)"
        );
    }

    #[test]
    fn bytes_are_unique_within_a_family() {
        for family in Family::ALL {
            let mut bytes: Vec<u8> = family
                .keys()
                .iter()
                .map(|k| family.resolve(&Value::parse(k)).unwrap().command_byte())
                .collect();
            bytes.sort_unstable();
            bytes.dedup();
            assert_eq!(bytes.len(), family.keys().len(), "{family}");
        }
    }
}

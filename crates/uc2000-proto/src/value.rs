//! Loosely-typed data values for name-driven encoding.
//!
//! The UC-2000 vocabulary mixes integer keys (`pwm_freq`, `max_pwm`),
//! text keys (`gate_logic`, `mode`), boolean keys (`lase`,
//! `lase_on_power_up`) and a numeric percentage. [`Value`] carries any of
//! these so a command named at runtime (for example from the command line)
//! can be paired with its data before the typed [`Command`](crate::Command)
//! is resolved.

use std::fmt;

/// A data value accompanying a command name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No data. Only meaningful for `status_request`.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Interpret a command-line token.
    ///
    /// `true`/`false` become [`Value::Bool`], anything that parses as an
    /// integer becomes [`Value::Int`], then [`Value::Float`], and every other
    /// token is kept as [`Value::Text`].
    pub fn parse(token: &str) -> Self {
        match token {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = token.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Text(token.to_string())
    }

    /// The value as an exact integer, if it is one.
    ///
    /// Floats with no fractional part count as integers (`5.0` is `5`).
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
            _ => None,
        }
    }

    /// The value as a number.
    ///
    /// Numeric text is parsed, booleans and [`Value::None`] are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(_) | Value::None => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tokens() {
        assert_eq!(Value::parse("true"), Value::Bool(true));
        assert_eq!(Value::parse("false"), Value::Bool(false));
        assert_eq!(Value::parse("20"), Value::Int(20));
        assert_eq!(Value::parse("-3"), Value::Int(-3));
        assert_eq!(Value::parse("12.5"), Value::Float(12.5));
        assert_eq!(Value::parse("anv_closed"), Value::Text("anv_closed".into()));
        // Case matters: only lowercase booleans are booleans.
        assert_eq!(Value::parse("True"), Value::Text("True".into()));
    }

    #[test]
    fn integral_floats_are_integers() {
        assert_eq!(Value::Float(10.0).as_integer(), Some(10));
        assert_eq!(Value::Float(10.5).as_integer(), None);
        assert_eq!(Value::Float(f64::NAN).as_integer(), None);
        assert_eq!(Value::Bool(true).as_integer(), None);
        assert_eq!(Value::Text("10".into()).as_integer(), None);
    }

    #[test]
    fn numbers_from_text() {
        assert_eq!(Value::Text(" 42.5 ".into()).as_number(), Some(42.5));
        assert_eq!(Value::Text("ten".into()).as_number(), None);
        assert_eq!(Value::Bool(false).as_number(), None);
        assert_eq!(Value::None.as_number(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Text("up".into()).to_string(), "\"up\"");
        assert_eq!(Value::Int(95).to_string(), "95");
        assert_eq!(Value::None.to_string(), "none");
    }
}

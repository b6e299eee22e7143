//! Typed setting values and their text encoding
//!
//! Booleans are written as `true`/`false` and read back as true only for
//! `true` or `1`. Floats are always written with three decimal places.

use std::fmt;

use super::error::ConfigError;
use crate::constants::document::FLOAT_PRECISION;

/// Declared type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A single typed setting value
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
}

impl SettingValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SettingValue::Bool(_) => ValueKind::Bool,
            SettingValue::Int(_) => ValueKind::Int,
            SettingValue::Float(_) => ValueKind::Float,
            SettingValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            SettingValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse raw document text as the given kind
    pub fn parse(kind: ValueKind, raw: &str) -> Result<Self, ConfigError> {
        match kind {
            ValueKind::Bool => Ok(SettingValue::Bool(parse_bool(raw))),
            ValueKind::Int => parse_int(raw).map(SettingValue::Int),
            ValueKind::Float => parse_float(raw).map(SettingValue::Float),
            ValueKind::Text => Ok(SettingValue::Text(raw.trim().to_string())),
        }
    }

    /// Encode for the settings document
    pub fn encode(&self) -> String {
        match self {
            SettingValue::Bool(b) => b.to_string(),
            SettingValue::Int(i) => i.to_string(),
            SettingValue::Float(f) => format_float(*f),
            // A value must stay on its own line
            SettingValue::Text(s) => s.replace(['\r', '\n'], " ").trim().to_string(),
        }
    }

    /// Clamp into `bounds`, returning the value unchanged when no bounds apply
    pub fn clamped(self, bounds: Option<Bounds>) -> Self {
        match bounds {
            Some(bounds) => bounds.clamp(self),
            None => self,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Int { min: i32, max: i32 },
    Float { min: f32, max: f32 },
}

impl Bounds {
    /// Clamp a value into these bounds.
    ///
    /// Never panics: an inverted range (possible when computed from a tiny
    /// desktop) resolves to `min`. Values of a different kind pass through.
    pub fn clamp(&self, value: SettingValue) -> SettingValue {
        match (*self, value) {
            (Bounds::Int { min, max }, SettingValue::Int(v)) => {
                SettingValue::Int(clamp_ordered(v, min, max))
            }
            (Bounds::Float { min, max }, SettingValue::Float(v)) => {
                SettingValue::Float(clamp_ordered(v, min, max))
            }
            (_, other) => other,
        }
    }

    pub fn contains(&self, value: &SettingValue) -> bool {
        match (*self, value) {
            (Bounds::Int { min, max }, SettingValue::Int(v)) => *v >= min && *v <= max,
            (Bounds::Float { min, max }, SettingValue::Float(v)) => *v >= min && *v <= max,
            _ => true,
        }
    }

    pub fn out_of_range(&self, value: &SettingValue) -> ConfigError {
        let (min, max) = match *self {
            Bounds::Int { min, max } => (min.to_string(), max.to_string()),
            Bounds::Float { min, max } => (format_float(min), format_float(max)),
        };
        ConfigError::OutOfRange {
            value: value.encode(),
            min,
            max,
        }
    }
}

fn clamp_ordered<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min || max < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// `true` and `1` are true; every other token is false
pub fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "1")
}

/// Parse an integer; overflow counts as malformed
pub fn parse_int(raw: &str) -> Result<i32, ConfigError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ConfigError::malformed(ValueKind::Int, raw))
}

/// Parse a finite float
pub fn parse_float(raw: &str) -> Result<f32, ConfigError> {
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigError::malformed(ValueKind::Float, raw)),
    }
}

pub fn format_float(value: f32) -> String {
    format!("{:.*}", FLOAT_PRECISION, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_bool_true_tokens() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool(" true "));
    }

    #[test]
    fn test_parse_bool_everything_else_false() {
        for raw in ["false", "0", "", "yes", "TRUE", "2", "garbage"] {
            assert!(!parse_bool(raw), "{raw:?} should parse as false");
        }
    }

    #[test]
    fn test_parse_int_rejects_garbage_and_overflow() {
        assert_eq!(parse_int(" 42 "), Ok(42));
        assert_eq!(parse_int("-7"), Ok(-7));
        assert!(parse_int("abc").is_err());
        assert!(parse_int("12abc").is_err());
        assert!(parse_int("99999999999").is_err());
        assert!(parse_int("").is_err());
    }

    #[test]
    fn test_parse_float_rejects_non_finite() {
        assert_eq!(parse_float("1.5"), Ok(1.5));
        assert!(parse_float("nan").is_err());
        assert!(parse_float("inf").is_err());
        assert!(parse_float("1e99").is_err());
        assert!(parse_float("one").is_err());
    }

    #[test]
    fn test_float_encoding_three_decimals() {
        assert_eq!(SettingValue::Float(1.0).encode(), "1.000");
        assert_eq!(SettingValue::Float(0.035).encode(), "0.035");
        assert_eq!(SettingValue::Float(2.0 / 3.0).encode(), "0.667");
    }

    #[test]
    fn test_bool_encoding() {
        assert_eq!(SettingValue::Bool(true).encode(), "true");
        assert_eq!(SettingValue::Bool(false).encode(), "false");
    }

    #[test]
    fn test_text_encoding_stays_on_one_line() {
        let value = SettingValue::Text("a.dll,\nb.dll".to_string());
        assert_eq!(value.encode(), "a.dll, b.dll");
    }

    #[test]
    fn test_clamp_int_and_float() {
        let int_bounds = Bounds::Int { min: 800, max: 1920 };
        assert_eq!(int_bounds.clamp(SettingValue::Int(100)), SettingValue::Int(800));
        assert_eq!(int_bounds.clamp(SettingValue::Int(5000)), SettingValue::Int(1920));
        assert_eq!(int_bounds.clamp(SettingValue::Int(1024)), SettingValue::Int(1024));

        let float_bounds = Bounds::Float { min: 0.5, max: 2.0 };
        assert_eq!(float_bounds.clamp(SettingValue::Float(0.1)), SettingValue::Float(0.5));
        assert_eq!(float_bounds.clamp(SettingValue::Float(9.0)), SettingValue::Float(2.0));
    }

    #[test]
    fn test_clamp_inverted_bounds_prefers_min() {
        let bounds = Bounds::Int { min: 800, max: 640 };
        assert_eq!(bounds.clamp(SettingValue::Int(700)), SettingValue::Int(800));
        assert_eq!(bounds.clamp(SettingValue::Int(10_000)), SettingValue::Int(800));
    }

    #[test]
    fn test_clamp_ignores_mismatched_kind() {
        let bounds = Bounds::Int { min: 0, max: 1 };
        assert_eq!(bounds.clamp(SettingValue::Bool(true)), SettingValue::Bool(true));
    }

    proptest! {
        #[test]
        fn prop_clamped_int_always_within_bounds(v in any::<i32>(), a in -5000i32..5000, span in 0i32..5000) {
            let bounds = Bounds::Int { min: a, max: a + span };
            let clamped = bounds.clamp(SettingValue::Int(v));
            prop_assert!(bounds.contains(&clamped));
            if bounds.contains(&SettingValue::Int(v)) {
                prop_assert_eq!(clamped, SettingValue::Int(v));
            }
        }

        #[test]
        fn prop_parse_bool_true_only_for_true_tokens(raw in "\\PC{0,8}") {
            let expected = matches!(raw.trim(), "true" | "1");
            prop_assert_eq!(parse_bool(&raw), expected);
        }
    }
}

//! Field values and best-effort numeric conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Converter;

/// A single field of a record.
///
/// `Null` is an absent value: it is written as an empty field and an
/// unquoted empty field decodes back to it. `Str("")` is written as `""` so
/// the two stay distinguishable on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text written to a delimited file for this value (before quoting).
    pub fn to_field_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(i) => i.to_string(),
            // Debug keeps the fractional part ("1.0"), so floats read back as floats.
            Value::Float(f) => format!("{f:?}"),
            Value::Str(s) => s.clone(),
        }
    }

    /// Apply converters in order; the first one that succeeds wins.
    ///
    /// Only strings are candidates. A failed conversion leaves the value
    /// untouched, it is never an error.
    pub(crate) fn convert(self, converters: &[Converter]) -> Value {
        let Value::Str(text) = self else {
            return self;
        };
        for converter in converters {
            let converted = match converter {
                Converter::Integer => parse_integer(&text),
                Converter::Float => parse_float(&text),
                Converter::Numeric => parse_integer(&text).or_else(|| parse_float(&text)),
            };
            if let Some(v) = converted {
                return v;
            }
        }
        Value::Str(text)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

fn parse_integer(text: &str) -> Option<Value> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok().map(Value::Int)
}

fn parse_float(text: &str) -> Option<Value> {
    // f64::from_str also accepts "inf", "NaN" and friends; those stay strings.
    let numeric_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !numeric_chars || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().map(Value::Float)
}

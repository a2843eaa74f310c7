//! Decoders for the loosely typed parts of the service's JSON.
//!
//! The backend is PHP, so the same field may come back as `43`, `43.0` or
//! `"43"` depending on the code path, empty maps are encoded as `[]`, and
//! flags show up as booleans, integers or strings.

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Sentinel the service uses for "not applicable" (e.g. `score_cdn: -1`).
pub const NOT_APPLICABLE: i64 = -1;

/// A numeric field exactly as it arrived on the wire.
///
/// Parsing of string values is deferred to the accessors, so a decode never
/// fails because a server sent a number as text.
#[derive(Debug, Clone)]
pub enum Number {
    Integer(i64),
    Float(f64),
    RawString(String),
}

impl Number {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(v) => Some(*v),
            Number::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            Number::Float(_) => None,
            Number::RawString(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| Number::Float(s.parse::<f64>().ok()?).as_i64())
            }
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(v) => Some(*v as f64),
            Number::Float(v) => Some(*v),
            Number::RawString(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// `-1` in any representation.
    pub fn is_not_applicable(&self) -> bool {
        self.as_i64() == Some(NOT_APPLICABLE)
    }

    pub(crate) fn from_value(value: &Value) -> Option<Number> {
        Number::deserialize(value).ok()
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Integer(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
            Number::RawString(s) => f.write_str(s),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                (None, None) => self.to_string() == other.to_string(),
                _ => false,
            },
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64()) {
            return Some(a.cmp(&b));
        }
        self.as_f64()?.partial_cmp(&other.as_f64()?)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Integer(v) => serializer.serialize_i64(*v),
            Number::Float(v) => serializer.serialize_f64(*v),
            Number::RawString(s) => serializer.serialize_str(s),
        }
    }
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Number;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
        Ok(Number::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
        // Keep the digits rather than rounding through f64.
        Ok(i64::try_from(v)
            .map(Number::Integer)
            .unwrap_or_else(|_| Number::RawString(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
        Ok(Number::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
        Ok(Number::RawString(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Number, E> {
        Ok(Number::RawString(v))
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}

/// Optional number that also treats `null` and `""` as absent.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => Some(Number::deserialize(&v).map_err(de::Error::custom)?),
    })
}

/// Integer that falls back to 0 when missing, null or unparsable.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_number(deserializer)?
        .and_then(|n| n.as_i64())
        .unwrap_or(0))
}

/// Flag that may be `true`, `1`, `"1"` or missing.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "on"),
        _ => false,
    })
}

/// String field that may be `null`.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Container that PHP may send as `[]` or `null` when empty.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::Array(items)) if items.is_empty() => Ok(T::default()),
        Some(v) => T::deserialize(v).map_err(de::Error::custom),
    }
}

/// Optional object that PHP may send as `[]` or `null` when absent.
pub fn opt_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(v) => T::deserialize(v).map(Some).map_err(de::Error::custom),
    }
}

//! Serde helpers for JSON request bodies.
//!
//! Clients send numbers both as JSON numbers and as strings (`"12"`), and
//! PATCH bodies need to tell an absent field apart from an explicit `null`.
use serde::{Deserialize, Deserializer};

/// A number that may arrive as a JSON number or as a numeric string.
///
/// Anything else (booleans, arrays, objects) lands in `Other` so validators
/// report it with their own code rather than failing body parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Numeric {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Numeric::Int(n) => Some(*n),
            Numeric::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Numeric::Float(_) => None,
            Numeric::Text(s) => s.trim().parse().ok(),
            Numeric::Other(_) => None,
        }
    }

    /// Finite value only; `NaN` and infinities parse as `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Numeric::Int(n) => *n as f64,
            Numeric::Float(f) => *f,
            Numeric::Text(s) => s.trim().parse().ok()?,
            Numeric::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<i64> for Numeric {
    fn from(n: i64) -> Self {
        Numeric::Int(n)
    }
}

impl From<f64> for Numeric {
    fn from(f: f64) -> Self {
        Numeric::Float(f)
    }
}

/// Use with `#[serde(default, deserialize_with = "double_option")]` so that a
/// missing field is `None` and `null` is `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::GuidError;

/// A guid-like identifier, always carried as a decimal string.
///
/// Guids exceed the range of `f64` and are compared textually, so leading
/// zeros and long digit runs survive every hop unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Parses a decimal guid string.
    pub fn parse(value: impl Into<String>) -> Result<Self, GuidError> {
        let value = value.into();
        if value.is_empty() {
            return Err(GuidError::Empty);
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GuidError::NotDecimal(value));
        }
        Ok(Self(value))
    }

    /// Reads a guid out of a JSON value.
    ///
    /// Strings are preferred. Unsigned integers are accepted for payloads
    /// written by older producers; anything else is rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, GuidError> {
        match value {
            serde_json::Value::String(s) => Self::parse(s.clone()),
            serde_json::Value::Number(n) if n.is_u64() => Self::parse(n.to_string()),
            other => Err(GuidError::NotDecimal(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Guid {
    type Err = GuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Guid::parse(raw).map_err(serde::de::Error::custom)
    }
}

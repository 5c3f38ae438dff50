//! Core data types shared by every source.
//!
//! - [`Symbol`] - Ticker symbol
//! - [`Profile`] - Free-form company attributes
//! - [`ProfileValue`] - One profile attribute

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::coerce::{Scale, coerce};
use crate::error::{DataError, Result};

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single company attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    /// A value already coerced to a number.
    Number(f64),
    /// Raw text as reported by the source.
    Text(String),
}

impl ProfileValue {
    /// Coerces this attribute to a number without scaling.
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => coerce(s, Scale::Unit),
        }
    }
}

impl From<f64> for ProfileValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ProfileValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ProfileValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Free-form company attributes (market cap, beta, sector, ...).
///
/// Lookups are best effort: a missing key reads as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    fields: BTreeMap<String, ProfileValue>,
}

impl Profile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a profile from a flat JSON object.
    ///
    /// Numbers are stored as numbers, strings as text, `null` is skipped.
    /// Nested values are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| DataError::format(format!("profile is not a JSON object: {value}")))?;

        let mut profile = Self::new();
        for (key, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Number(n) => {
                    let n = n.as_f64().ok_or_else(|| {
                        DataError::format(format!("profile field {key:?} is out of range"))
                    })?;
                    profile.insert(key.clone(), n);
                }
                serde_json::Value::String(s) => profile.insert(key.clone(), s.as_str()),
                serde_json::Value::Bool(b) => profile.insert(key.clone(), b.to_string()),
                other => {
                    return Err(DataError::format(format!(
                        "profile field {key:?} is not flat: {other}"
                    )));
                }
            }
        }
        Ok(profile)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ProfileValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Raw attribute, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProfileValue> {
        self.fields.get(key)
    }

    /// Attribute coerced to a number; a missing key is zero.
    ///
    /// Text that is not numeric fails with [`DataError::Format`].
    pub fn value(&self, key: &str) -> Result<f64> {
        match self.fields.get(key) {
            Some(value) => value.as_number().map_err(|_| {
                DataError::format(format!("profile field {key:?} is not numeric: {value:?}"))
            }),
            None => Ok(0.0),
        }
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the profile has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

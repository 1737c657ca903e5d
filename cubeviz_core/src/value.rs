// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar cell values.

extern crate alloc;

use alloc::string::String;

/// A point in time, in milliseconds since the Unix epoch.
///
/// Timestamps are integral so they can key grouping maps and sort totally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the epoch.
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Returns milliseconds since the epoch.
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as `f64` milliseconds (the unit used on numeric chart axes).
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A single cell in an [`Observation`](crate::Observation).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// A numeric measure or numeric code.
    Number(f64),
    /// A label, code or URI.
    Text(String),
    /// A date or datetime.
    Time(Timestamp),
    /// An explicitly missing cell.
    #[default]
    Null,
}

impl Value {
    /// Returns the number if this is a finite [`Value::Number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns the text if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a [`Value::Time`].
    pub fn as_time(&self) -> Option<Timestamp> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::Time(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_numbers_read_as_missing() {
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_number(), None);
        assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
    }

    #[test]
    fn option_converts_to_null() {
        assert!(Value::from(None::<f64>).is_null());
        assert_eq!(Value::from(Some("a")), Value::Text(String::from("a")));
    }
}

// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observation rows.

extern crate alloc;

use alloc::string::String;

use hashbrown::HashMap;

use crate::{Timestamp, Value};

/// One row of a statistical cube: a mapping from column id to a scalar [`Value`].
///
/// Observations are owned by the upstream fetch layer and never mutated by the compiler.
/// A column that is absent and a column holding [`Value::Null`] read the same way.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Observation {
    fields: HashMap<String, Value>,
}

impl Observation {
    /// Creates an empty observation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this observation with `column` set to `value`.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Returns the raw cell for `column`, skipping explicit nulls.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column).filter(|v| !v.is_null())
    }

    /// Reads a finite number.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_number)
    }

    /// Reads a text cell.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    /// Reads a timestamp cell.
    pub fn time(&self, column: &str) -> Option<Timestamp> {
        self.get(column).and_then(Value::as_time)
    }

    /// Number of columns carried (including explicit nulls).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no columns are carried.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if `column` holds a non-null value.
    pub fn has(&self, column: &str) -> bool {
        self.get(column).is_some()
    }
}

impl<K, V> FromIterator<(K, V)> for Observation
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

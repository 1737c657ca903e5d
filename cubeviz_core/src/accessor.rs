// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessor types and column-reading helpers.
//!
//! An accessor is a pure function from an [`Observation`] to an optional typed value. Chart
//! compilers take several named accessors (`x`, `y`, `segment`, `category`, `error_range`, ...)
//! and never look at observation columns directly.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;

use crate::{Observation, Timestamp, Value};

/// A shared, thread-safe accessor returning `Option<T>`.
pub type Accessor<T> = Arc<dyn Fn(&Observation) -> Option<T> + Send + Sync>;

/// Reads a number.
pub type NumberAccessor = Accessor<f64>;
/// Reads a grouping key or label.
pub type TextAccessor = Accessor<String>;
/// Reads a timestamp.
pub type TimeAccessor = Accessor<Timestamp>;
/// Reads a presence flag (for example "this observation carries an error interval").
pub type FlagAccessor = Accessor<bool>;
/// Reads a `(low, high)` interval.
pub type RangeAccessor = Accessor<(f64, f64)>;

/// Reads a finite number from `column`.
pub fn number_column(column: impl Into<String>) -> NumberAccessor {
    let column = column.into();
    Arc::new(move |d| d.number(&column))
}

/// Reads a key from `column`.
///
/// Numbers are stringified so numeric codes can be used as categories and segments.
pub fn text_column(column: impl Into<String>) -> TextAccessor {
    let column = column.into();
    Arc::new(move |d| match d.get(&column)? {
        Value::Text(s) => Some(s.clone()),
        Value::Number(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    })
}

/// Reads a timestamp from `column`.
///
/// Finite numbers are interpreted as epoch milliseconds.
pub fn time_column(column: impl Into<String>) -> TimeAccessor {
    let column = column.into();
    Arc::new(move |d| match d.get(&column)? {
        Value::Time(t) => Some(*t),
        Value::Number(n) if n.is_finite() => {
            #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
            let ms = n.clamp(i64::MIN as f64, i64::MAX as f64) as i64;
            Some(Timestamp(ms))
        }
        _ => None,
    })
}

/// Reads a presence flag: `true` when `column` holds any non-null value other than `0`,
/// `false`, or an empty string.
pub fn flag_column(column: impl Into<String>) -> FlagAccessor {
    let column = column.into();
    Arc::new(move |d| {
        Some(match d.get(&column) {
            None => false,
            Some(Value::Number(n)) => *n != 0.0 && !n.is_nan(),
            Some(Value::Text(s)) => !s.is_empty() && s != "false" && s != "0",
            Some(Value::Time(_)) => true,
            Some(Value::Null) => false,
        })
    })
}

/// Reads an interval from a pair of numeric columns.
///
/// Returns `None` unless both bounds are present.
pub fn range_columns(low: impl Into<String>, high: impl Into<String>) -> RangeAccessor {
    let low = low.into();
    let high = high.into();
    Arc::new(move |d| Some((d.number(&low)?, d.number(&high)?)))
}

/// An accessor that yields the same key for every observation.
pub fn constant_text(key: impl Into<String>) -> TextAccessor {
    let key = key.into();
    Arc::new(move |_| Some(key.clone()))
}

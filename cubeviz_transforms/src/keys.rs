// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping key derivation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use cubeviz_core::Observation;
use hashbrown::HashSet;

/// Values for one segment, aligned to an ordered key axis (categories or timestamps).
///
/// `values[i]` belongs to the i-th key; `None` marks a cell with no observation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentValues {
    /// Segment identity (used as the series name).
    pub segment: String,
    /// Aligned values.
    pub values: Vec<Option<f64>>,
}

impl SegmentValues {
    /// Creates aligned values for `segment`.
    pub fn new(segment: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            segment: segment.into(),
            values,
        }
    }
}

/// Returns the distinct keys in first-occurrence order.
///
/// Observations for which `key` yields `None` are skipped.
pub fn unique_in_order(
    observations: &[Observation],
    key: impl Fn(&Observation) -> Option<String>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for d in observations {
        let Some(k) = key(d) else {
            continue;
        };
        if seen.insert(k.clone()) {
            out.push(k);
        }
    }
    out
}

/// Returns the distinct keys in ascending lexical order.
pub fn unique_sorted(
    observations: &[Observation],
    key: impl Fn(&Observation) -> Option<String>,
) -> Vec<String> {
    let mut out = unique_in_order(observations, key);
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use cubeviz_core::text_column;

    fn rows(keys: &[&str]) -> Vec<Observation> {
        keys.iter()
            .map(|k| Observation::new().with("seg", *k))
            .collect()
    }

    #[test]
    fn first_occurrence_order_is_preserved() {
        let obs = rows(&["b", "a", "b", "c", "a"]);
        let get = text_column("seg");
        assert_eq!(unique_in_order(&obs, &*get), ["b", "a", "c"]);
        assert_eq!(unique_sorted(&obs, &*get), ["a", "b", "c"]);
    }

    #[test]
    fn missing_keys_are_skipped() {
        let mut obs = rows(&["a"]);
        obs.push(Observation::new());
        assert_eq!(unique_in_order(&obs, &*text_column("seg")), ["a"]);
    }
}

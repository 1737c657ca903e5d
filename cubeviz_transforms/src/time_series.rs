// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-series grouping and alignment.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use cubeviz_core::{NumberAccessor, Observation, TextAccessor, TimeAccessor, Timestamp};
use hashbrown::{HashMap, HashSet};

use crate::keys::{SegmentValues, unique_in_order};

/// Group key used when no segmentation is requested.
pub const DEFAULT_SERIES_KEY: &str = "default";

/// Returns the sorted, de-duplicated set of timestamps read by `x`.
///
/// Observations without a timestamp are skipped.
pub fn collect_timestamps(
    observations: &[Observation],
    x: impl Fn(&Observation) -> Option<Timestamp>,
) -> Vec<Timestamp> {
    let mut seen = HashSet::new();
    let mut out: Vec<Timestamp> = observations
        .iter()
        .filter_map(x)
        .filter(|t| seen.insert(*t))
        .collect();
    out.sort_unstable();
    out
}

/// Builds the literal series array for an ordered timestamp axis.
///
/// The output always has `xs.len()` entries and `out[i]` is `map[xs[i]]`, with `None` for any
/// timestamp the map does not cover. Positions are never omitted, so independently built series
/// stay positionally comparable.
pub fn build_time_series_data(
    map: &HashMap<Timestamp, Option<f64>>,
    xs: &[Timestamp],
) -> Vec<Option<f64>> {
    xs.iter().map(|x| map.get(x).copied().flatten()).collect()
}

/// One segment's values keyed by timestamp.
///
/// After grouping, `values` holds an entry for every timestamp of the global axis.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesGroup {
    /// Segment key, or [`DEFAULT_SERIES_KEY`].
    pub key: String,
    /// Timestamp to value.
    pub values: HashMap<Timestamp, Option<f64>>,
}

impl TimeSeriesGroup {
    /// Returns this group's values aligned on `xs`.
    pub fn aligned(&self, xs: &[Timestamp]) -> Vec<Option<f64>> {
        build_time_series_data(&self.values, xs)
    }
}

/// Output of [`TimeSeriesGrouping::group`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedTimeSeries {
    /// Sorted unique timestamps across all observations.
    pub timestamps: Vec<Timestamp>,
    /// One group per segment, in segment order.
    pub groups: Vec<TimeSeriesGroup>,
}

impl GroupedTimeSeries {
    /// Returns every group aligned on the global timestamp axis.
    pub fn aligned(&self) -> Vec<SegmentValues> {
        self.groups
            .iter()
            .map(|g| SegmentValues::new(g.key.clone(), g.aligned(&self.timestamps)))
            .collect()
    }

    /// Returns `true` if there are no timestamps.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Groups observations into per-segment time series.
///
/// Without a segment accessor, every observation lands in the single group
/// [`DEFAULT_SERIES_KEY`]. With one, groups follow the explicit segment order when given, or
/// first-occurrence order otherwise. Observations whose segment is not part of an explicit order
/// are dropped.
///
/// Within a group a later observation for an already-seen timestamp overwrites the earlier value.
#[derive(Clone)]
pub struct TimeSeriesGrouping {
    x: TimeAccessor,
    y: NumberAccessor,
    segment: Option<TextAccessor>,
    segment_order: Option<Vec<String>>,
}

impl core::fmt::Debug for TimeSeriesGrouping {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimeSeriesGrouping")
            .field("segment", &self.segment.is_some())
            .field("segment_order", &self.segment_order)
            .finish_non_exhaustive()
    }
}

impl TimeSeriesGrouping {
    /// Creates an unsegmented grouping reading timestamps with `x` and values with `y`.
    pub fn new(x: TimeAccessor, y: NumberAccessor) -> Self {
        Self {
            x,
            y,
            segment: None,
            segment_order: None,
        }
    }

    /// Splits observations by `segment`.
    pub fn with_segment(mut self, segment: TextAccessor) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Uses a caller-chosen segment order instead of first occurrence.
    ///
    /// A key listed more than once yields a single group at its first position.
    pub fn with_segment_order(mut self, order: Vec<String>) -> Self {
        self.segment_order = Some(order);
        self
    }

    /// Runs the grouping.
    pub fn group(&self, observations: &[Observation]) -> GroupedTimeSeries {
        let timestamps = collect_timestamps(observations, &*self.x);

        let keys = match (&self.segment, &self.segment_order) {
            (None, _) => vec![String::from(DEFAULT_SERIES_KEY)],
            (Some(_), Some(order)) => {
                let mut seen = HashSet::with_capacity(order.len());
                order
                    .iter()
                    .filter(|k| seen.insert(k.as_str()))
                    .cloned()
                    .collect()
            }
            (Some(segment), None) => unique_in_order(observations, &**segment),
        };

        let index: HashMap<&str, usize> =
            keys.iter().enumerate().map(|(i, k)| (k.as_str(), i)).collect();

        let empty: HashMap<Timestamp, Option<f64>> =
            timestamps.iter().map(|t| (*t, None)).collect();
        let mut groups: Vec<TimeSeriesGroup> = keys
            .iter()
            .map(|k| TimeSeriesGroup {
                key: k.clone(),
                values: empty.clone(),
            })
            .collect();

        for d in observations {
            let Some(x) = (self.x)(d) else {
                continue;
            };
            let slot = match &self.segment {
                None => Some(0),
                Some(segment) => segment(d).and_then(|s| index.get(s.as_str()).copied()),
            };
            let Some(slot) = slot else {
                log::trace!("time series: dropping observation outside the segment order");
                continue;
            };
            groups[slot].values.insert(x, (self.y)(d));
        }

        GroupedTimeSeries { timestamps, groups }
    }
}

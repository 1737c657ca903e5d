// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping and pivoting of observations into chart-ready series data.
//!
//! This crate turns a flat observation list plus accessors into:
//! - ordered key lists (segments, categories) derived by first occurrence or sorting,
//! - per-segment time series aligned on one global timestamp axis (gaps are `None`),
//! - per-category and per-(category, segment) lookups, and
//! - sparse error-whisker rows for uncertainty overlays.
//!
//! Everything here is a full recompute over its inputs: no caching and no shared state, so
//! calling it again with the same observations yields the same output.

#![no_std]

extern crate alloc;

mod category;
mod keys;
mod time_series;
mod whisker;

pub use category::{category_values, find_by_category, find_by_category_and_segment, segment_values};
pub use keys::{SegmentValues, unique_in_order, unique_sorted};
pub use time_series::{
    DEFAULT_SERIES_KEY, GroupedTimeSeries, TimeSeriesGroup, TimeSeriesGrouping,
    build_time_series_data, collect_timestamps,
};
pub use whisker::{
    ErrorWhiskerDatum, build_error_whisker_data, build_grouped_error_whisker_data,
    grouped_offset,
};

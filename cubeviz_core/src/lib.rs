// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observation records and column accessors.
//!
//! This crate is the data boundary of the CubeViz chart compiler:
//! - **Observations** are immutable rows fetched upstream (from a statistical cube) and
//!   handed to the compiler as a finite in-memory list.
//! - **Accessors** are pure readers from an observation to an optional typed value. Absence is
//!   always `None`; accessors never fail.
//!
//! Everything above this crate (grouping, axes, series, layout) only ever reads observations
//! through accessors.

#![no_std]

extern crate alloc;

mod accessor;
mod observation;
mod value;

pub use accessor::{
    Accessor, FlagAccessor, NumberAccessor, RangeAccessor, TextAccessor, TimeAccessor,
    constant_text, flag_column, number_column, range_columns, text_column, time_column,
};
pub use observation::Observation;
pub use value::{Timestamp, Value};

// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis descriptors.
//!
//! A chart has one or more x axes and one or more y axes. Each [`AxisSpec`] is a single type
//! (category, value, or time) plus placement and label options, mirroring how rendering engines
//! model axes. Value axes always carry an explicit `min` and `max`, so partial data never makes
//! the axis rescale between renders.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use cubeviz_transforms::SegmentValues;

use crate::format::format_number;
use crate::scale::{ScaleLinearSpec, infer_domain, nice_ticks};

/// The kind of values an axis displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AxisType {
    /// Discrete, ordered labels.
    Category,
    /// Continuous numbers.
    Value,
    /// Continuous epoch milliseconds.
    Time,
}

/// Axis placement relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AxisPosition {
    /// Above the plot.
    Top,
    /// Below the plot.
    Bottom,
    /// Left of the plot.
    Left,
    /// Right of the plot.
    Right,
}

/// Formats a value axis tick.
pub type TickFormatter = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// An axis descriptor.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisSpec {
    /// Axis type.
    pub axis_type: AxisType,
    /// Optional axis name (title).
    pub name: Option<String>,
    /// Ordered tick labels of a category axis, already formatted. Empty for other types.
    pub data: Vec<String>,
    /// Explicit lower bound of a value or time axis.
    pub min: Option<f64>,
    /// Explicit upper bound of a value or time axis.
    pub max: Option<f64>,
    /// Optional placement; engines pick their default when `None`.
    pub position: Option<AxisPosition>,
    /// Optional axis line and label color.
    pub color: Option<String>,
    /// Whether gridlines are drawn from this axis across the plot.
    pub split_line: bool,
    /// Tick label rotation in degrees.
    pub label_rotation: f64,
    /// Tick label font size in pixels.
    pub label_font_size: Option<f64>,
    /// Whether category bands leave a half-band gap at each end (bars) or not (lines, areas).
    pub boundary_gap: bool,
    /// Optional value tick formatter.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub tick_formatter: Option<TickFormatter>,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("axis_type", &self.axis_type)
            .field("name", &self.name)
            .field("data", &self.data)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("position", &self.position)
            .field("color", &self.color)
            .field("split_line", &self.split_line)
            .field("label_rotation", &self.label_rotation)
            .field("label_font_size", &self.label_font_size)
            .field("boundary_gap", &self.boundary_gap)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .finish()
    }
}

impl AxisSpec {
    fn with_type(axis_type: AxisType) -> Self {
        Self {
            axis_type,
            name: None,
            data: Vec::new(),
            min: None,
            max: None,
            position: None,
            color: None,
            split_line: false,
            label_rotation: 0.0,
            label_font_size: None,
            boundary_gap: true,
            tick_formatter: None,
        }
    }

    /// A category axis over `labels`, in the caller's order.
    ///
    /// Each label is passed through `formatter` when given (identity otherwise).
    pub fn category<S: AsRef<str>>(labels: &[S], formatter: Option<&dyn Fn(&str) -> String>) -> Self {
        let data = labels
            .iter()
            .map(|l| match formatter {
                Some(f) => f(l.as_ref()),
                None => String::from(l.as_ref()),
            })
            .collect();
        Self {
            data,
            ..Self::with_type(AxisType::Category)
        }
    }

    /// A value axis with explicit bounds and gridlines.
    pub fn value(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            split_line: true,
            ..Self::with_type(AxisType::Value)
        }
    }

    /// A time axis with explicit bounds in epoch milliseconds.
    pub fn time(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            boundary_gap: false,
            ..Self::with_type(AxisType::Time)
        }
    }

    /// Sets the axis name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the axis line and label color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Enables or disables gridlines.
    pub fn with_split_line(mut self, split_line: bool) -> Self {
        self.split_line = split_line;
        self
    }

    /// Sets the tick label rotation in degrees.
    pub fn with_label_rotation(mut self, degrees: f64) -> Self {
        self.label_rotation = degrees;
        self
    }

    /// Sets the tick label font size.
    pub fn with_label_font_size(mut self, size: f64) -> Self {
        self.label_font_size = Some(size);
        self
    }

    /// Sets the axis placement.
    pub fn with_position(mut self, position: AxisPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets whether category bands have a half-band gap at both ends.
    pub fn with_boundary_gap(mut self, boundary_gap: bool) -> Self {
        self.boundary_gap = boundary_gap;
        self
    }

    /// Sets the value tick formatter.
    pub fn with_tick_formatter(mut self, formatter: TickFormatter) -> Self {
        self.tick_formatter = Some(formatter);
        self
    }

    /// Returns the tick labels this axis displays.
    ///
    /// Category axes return their labels. Value and time axes format about `count` nice ticks
    /// between `min` and `max` with the tick formatter, or with two-decimal number formatting.
    pub fn tick_labels(&self, count: usize) -> Vec<String> {
        match self.axis_type {
            AxisType::Category => self.data.clone(),
            AxisType::Value | AxisType::Time => {
                let (Some(min), Some(max)) = (self.min, self.max) else {
                    return Vec::new();
                };
                nice_ticks(min, max, count)
                    .into_iter()
                    .filter(|t| *t >= min.min(max) && *t <= max.max(min))
                    .map(|t| match &self.tick_formatter {
                        Some(f) => f(t),
                        None => format_number(t, 2),
                    })
                    .collect()
            }
        }
    }
}

/// One side of a dual-axis layout.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisSide {
    /// Axis name.
    pub name: String,
    /// Explicit lower bound.
    pub min: f64,
    /// Explicit upper bound.
    pub max: f64,
    /// Optional axis color, usually matching the series plotted against it.
    pub color: Option<String>,
}

impl AxisSide {
    /// Creates an axis side.
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            color: None,
        }
    }

    /// Sets the axis color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Two independently scaled value axes sharing one category axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DualAxisSpec {
    /// The left axis.
    pub left: AxisSide,
    /// The right axis.
    pub right: AxisSide,
}

/// Builds the `[left, right]` value axes of a dual-axis chart.
///
/// The left axis draws gridlines; the right axis never does, so the two grids do not overlap.
pub fn dual_value_axes(spec: &DualAxisSpec) -> [AxisSpec; 2] {
    let side = |s: &AxisSide, position: AxisPosition, split_line: bool| {
        let mut axis = AxisSpec::value(s.min, s.max)
            .with_name(s.name.clone())
            .with_position(position)
            .with_split_line(split_line);
        axis.color.clone_from(&s.color);
        axis
    };
    [
        side(&spec.left, AxisPosition::Left, true),
        side(&spec.right, AxisPosition::Right, false),
    ]
}

/// Picks explicit, rounded value axis bounds for `values`.
///
/// Non-finite values are ignored; with no finite values the extent is `(0, 1)`. With
/// `include_zero` the extent is widened to contain zero, which bar charts need so bars start at
/// the baseline.
pub fn value_extent(values: impl IntoIterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let Some((mut min, mut max)) = infer_domain(values) else {
        return (0.0, 1.0);
    };
    if include_zero || min == max {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if min == max {
        return (0.0, 1.0);
    }
    ScaleLinearSpec::new((min, max))
        .with_nice(true)
        .resolved_domain(5)
}

/// Values the value axis must cover: every cell, or per-category positive and negative totals
/// when segments stack.
pub fn extent_values(rows: &[SegmentValues], stacked: bool) -> impl Iterator<Item = f64> + '_ {
    let cells = rows
        .iter()
        .flat_map(|r| r.values.iter().flatten().copied())
        .filter(move |_| !stacked);
    let width = rows.iter().map(|r| r.values.len()).max().unwrap_or(0);
    let totals = (0..width)
        .filter(move |_| stacked)
        .flat_map(move |i| {
            let (pos, neg) = rows
                .iter()
                .filter_map(|r| r.values.get(i).copied().flatten())
                .filter(|v| v.is_finite())
                .fold((0.0, 0.0), |(p, n), v| {
                    if v >= 0.0 { (p + v, n) } else { (p, n + v) }
                });
            [pos, neg]
        });
    cells.chain(totals)
}

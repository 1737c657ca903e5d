// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart specification compiler for CubeViz.
//!
//! This crate turns observations (see `cubeviz_core`) into a declarative
//! [`ChartSpecification`]: axes, series, grid, legend and tooltip, in a shape a rendering engine
//! can draw directly. It is a thin layer above `cubeviz_transforms`:
//! - **Safe accessors** turn partial bounds and scale domains into finite numbers.
//! - **Axis and series builders** produce engine descriptors from aligned values.
//! - **Error whiskers** are projected into stroke paths through a [`CoordinateSystem`].
//! - **Responsive layout** picks margins, font sizes, symbol sizes and label rotation by width.
//! - **Tooltip formatters** render engine payloads into escaped HTML.
//! - **Validation** reports problems in data, numbers and domains without failing.
//!
//! The chart compilers ([`CategoryChartSpec`], [`TimeSeriesChartSpec`], [`ComboChartSpec`],
//! [`ScatterChartSpec`], [`PieChartSpec`]) tie these together. Compiling never fails: missing
//! values become gaps and degenerate inputs fall back to defaults.
//!
//! Rendering and text shaping are out of scope; text is measured with a pluggable
//! [`TextMeasurer`].

#![no_std]

extern crate alloc;

mod axis;
mod category_chart;
mod chart_spec;
mod combo_chart;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod layout;
mod legend;
mod palette;
mod pie_chart;
mod responsive;
mod safe;
mod scale;
mod scatter_chart;
mod series;
mod time;
mod time_series_chart;
mod tooltip;
mod validate;
mod whisker;

#[cfg(test)]
mod chart_tests;

pub use axis::{
    AxisPosition, AxisSide, AxisSpec, AxisType, DualAxisSpec, TickFormatter, dual_value_axes,
    extent_values, value_extent,
};
pub use category_chart::{BarLayout, CategoryChartSpec, LabelFormatter};
pub use chart_spec::{ChartOptions, ChartSpecification, TooltipSpec, TooltipTrigger};
pub use combo_chart::ComboChartSpec;
pub use format::{escape_html, format_number};
pub use layout::{
    Bounds, Grid, HeuristicTextMeasurer, Margins, TextMeasurer, right_axis_label_width,
};
pub use legend::{LegendOrient, LegendPosition, LegendSpec};
pub use palette::{SharedColorFn, categorical_colors, color_hex, palette_color, palette_colors};
pub use pie_chart::PieChartSpec;
pub use responsive::{
    Breakpoint, FontSizes, ResponsiveConfig, ResponsiveLayout, average_label_length,
    calculate_axis_label_rotation, responsive_font_sizes, responsive_margins,
    responsive_symbol_size,
};
pub use safe::{
    DomainProvider, PartialBounds, PartialMargins, safe_bounds, safe_domain, safe_margins,
    safe_number,
};
pub use scale::{ScaleBand, ScaleLinear, ScaleLinearSpec, infer_domain};
pub use scatter_chart::{ScatterChartSpec, ScatterGroups};
pub use series::{
    BarOptions, ColorFn, DEFAULT_STACK_KEY, LineOptions, PieOptions, ScatterOptions, SeriesDatum,
    SeriesEnvelope, SeriesSpec, SeriesType, area_series, area_series_group, bar_series,
    bar_series_group, error_whisker_series, line_series, line_series_group, pie_series,
    scatter_series, scatter_series_group, series_data, stacked_area_series_group,
    stacked_bar_series_group,
};
pub use time::{TimeGranularity, format_time_labels, format_timestamp, infer_granularity};
pub use time_series_chart::{TimeSeriesChartSpec, TimeSeriesKind};
pub use tooltip::{
    TooltipFormatter, TooltipOptions, TooltipParam, TooltipValue, ValueFormatter,
    category_tooltip, dual_axis_tooltip, parse_params, pie_tooltip, scatter_tooltip,
    time_series_tooltip,
};
pub use validate::{
    ValidationIssue, ValidationReport, validate_axis_domain, validate_data_array,
    validate_numeric, validate_observations, validate_series_values,
};
pub use whisker::{
    CartesianCoordinates, CoordinateSystem, ErrorWhiskerRenderer, Orientation, WHISKER_Z,
    WhiskerShape, WhiskerStyle,
};

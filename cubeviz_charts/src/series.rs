// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series descriptors.
//!
//! Every builder takes the same [`SeriesEnvelope`] (name, data, color, animation) plus a small
//! options struct for its type. Grouped builders map a segment list through the single-series
//! builder and take colors from a caller-supplied function; no builder picks colors itself.
//!
//! Stacking is done by the rendering engine: series sharing a `stack` key are summed. Builders
//! only tag every member of a stacked family with the same key. Members of a grouped family
//! never carry a key.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use cubeviz_transforms::{ErrorWhiskerDatum, SegmentValues};

use crate::whisker::ErrorWhiskerRenderer;

/// The stack key stacked builders use unless told otherwise.
pub const DEFAULT_STACK_KEY: &str = "total";

/// Maps a segment name to a color string.
pub type ColorFn<'a> = &'a dyn Fn(&str) -> String;

/// The series kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SeriesType {
    /// Bars (columns when vertical).
    Bar,
    /// Lines, and areas (lines with a fill).
    Line,
    /// Scattered symbols.
    Scatter,
    /// Pie slices.
    Pie,
    /// An engine-side custom render item, used for error whiskers.
    Custom,
}

/// One point in a built series.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SeriesDatum {
    /// A missing value; the position is kept.
    Null,
    /// A bare value.
    Value(f64),
    /// An `(x, y)` pair, for scatter series.
    Point {
        /// Horizontal value.
        x: f64,
        /// Vertical value.
        y: f64,
    },
    /// A named value, for pie slices.
    Named {
        /// Slice name.
        name: String,
        /// Slice value.
        value: f64,
        /// Optional slice color.
        color: Option<String>,
    },
    /// A value with an explicit color override.
    Styled {
        /// The value.
        value: f64,
        /// The override color.
        color: String,
    },
    /// An error-whisker interval.
    Whisker(ErrorWhiskerDatum),
}

impl SeriesDatum {
    /// Returns the plotted number, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Value(v) | Self::Styled { value: v, .. } | Self::Named { value: v, .. } => Some(*v),
            Self::Point { y, .. } => Some(*y),
            Self::Whisker(w) => Some(w.high),
        }
    }

    /// Returns `true` for [`SeriesDatum::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Option<f64>> for SeriesDatum {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Value(v),
            _ => Self::Null,
        }
    }
}

impl From<f64> for SeriesDatum {
    fn from(value: f64) -> Self {
        Self::from(Some(value))
    }
}

/// Converts aligned optional values into series data, keeping every position.
pub fn series_data(values: &[Option<f64>]) -> Vec<SeriesDatum> {
    values.iter().map(|v| SeriesDatum::from(*v)).collect()
}

/// The fields every series builder accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesEnvelope {
    /// Series name, shown in the legend and tooltips.
    pub name: String,
    /// Series data.
    pub data: Vec<SeriesDatum>,
    /// Optional series color.
    pub color: Option<String>,
    /// Whether the engine animates this series.
    pub animation: bool,
}

impl SeriesEnvelope {
    /// Creates an envelope with no color and animation on.
    pub fn new(name: impl Into<String>, data: Vec<SeriesDatum>) -> Self {
        Self {
            name: name.into(),
            data,
            color: None,
            animation: true,
        }
    }

    /// Sets the series color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Enables or disables animation.
    pub fn with_animation(mut self, animation: bool) -> Self {
        self.animation = animation;
        self
    }
}

/// A built series descriptor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesSpec {
    /// Series kind.
    pub series_type: SeriesType,
    /// Series name.
    pub name: String,
    /// Series data.
    pub data: Vec<SeriesDatum>,
    /// Optional series color.
    pub color: Option<String>,
    /// Whether the engine animates this series.
    pub animation: bool,
    /// Stack key shared by every member of a stacked family.
    pub stack: Option<String>,
    /// Bar width in pixels.
    pub bar_width: Option<f64>,
    /// Whether lines are smoothed.
    pub smooth: bool,
    /// Whether line point markers are drawn.
    pub show_symbol: bool,
    /// Symbol size in pixels, for lines with markers and scatter series.
    pub symbol_size: Option<f64>,
    /// Line width in pixels.
    pub line_width: Option<f64>,
    /// Fill opacity under a line; `Some` makes the line an area.
    pub area_opacity: Option<f64>,
    /// Overall opacity.
    pub opacity: Option<f64>,
    /// Pie radii as fractions of the available radius, `(inner, outer)`.
    pub radius: Option<(f64, f64)>,
    /// Index of the x axis this series is plotted against.
    pub x_axis_index: usize,
    /// Index of the y axis this series is plotted against.
    pub y_axis_index: usize,
    /// Paint order; higher draws on top.
    pub z: i32,
    /// Custom render item for [`SeriesType::Custom`].
    pub render_item: Option<ErrorWhiskerRenderer>,
}

impl SeriesSpec {
    fn from_envelope(series_type: SeriesType, envelope: SeriesEnvelope) -> Self {
        Self {
            series_type,
            name: envelope.name,
            data: envelope.data,
            color: envelope.color,
            animation: envelope.animation,
            stack: None,
            bar_width: None,
            smooth: false,
            show_symbol: true,
            symbol_size: None,
            line_width: None,
            area_opacity: None,
            opacity: None,
            radius: None,
            x_axis_index: 0,
            y_axis_index: 0,
            z: 0,
            render_item: None,
        }
    }

    /// Tags this series with a stack key.
    pub fn with_stack(mut self, key: impl Into<String>) -> Self {
        self.stack = Some(key.into());
        self
    }

    /// Plots this series against the y axis at `index`.
    pub fn with_y_axis_index(mut self, index: usize) -> Self {
        self.y_axis_index = index;
        self
    }

    /// Enables or disables animation.
    pub fn with_animation(mut self, animation: bool) -> Self {
        self.animation = animation;
        self
    }
}

/// Bar options.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarOptions {
    /// Bar width in pixels; the engine decides when `None`.
    pub bar_width: Option<f64>,
}

/// Line and area options.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineOptions {
    /// Whether lines are smoothed. Areas are always smoothed.
    pub smooth: bool,
    /// Whether point markers are drawn. Areas never draw markers.
    pub show_symbol: bool,
    /// Marker size in pixels.
    pub symbol_size: Option<f64>,
    /// Line width in pixels. Areas always use `1`.
    pub line_width: Option<f64>,
    /// Fill opacity used by area series.
    pub area_opacity: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            smooth: false,
            show_symbol: true,
            symbol_size: None,
            line_width: Some(2.0),
            area_opacity: 0.3,
        }
    }
}

/// Scatter options.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterOptions {
    /// Symbol size in pixels.
    pub symbol_size: f64,
    /// Symbol opacity.
    pub opacity: f64,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            symbol_size: 6.0,
            opacity: 0.8,
        }
    }
}

/// Pie options.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieOptions {
    /// Inner radius fraction; non-zero makes a donut.
    pub inner_radius: f64,
    /// Outer radius fraction.
    pub outer_radius: f64,
}

impl Default for PieOptions {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            outer_radius: 0.7,
        }
    }
}

/// Builds a bar series.
pub fn bar_series(envelope: SeriesEnvelope, options: &BarOptions) -> SeriesSpec {
    SeriesSpec {
        bar_width: options.bar_width,
        ..SeriesSpec::from_envelope(SeriesType::Bar, envelope)
    }
}

/// Builds a line series.
pub fn line_series(envelope: SeriesEnvelope, options: &LineOptions) -> SeriesSpec {
    SeriesSpec {
        smooth: options.smooth,
        show_symbol: options.show_symbol,
        symbol_size: options.symbol_size,
        line_width: options.line_width,
        ..SeriesSpec::from_envelope(SeriesType::Line, envelope)
    }
}

/// Builds an area series: a smoothed line without markers, width `1`, with a fill.
pub fn area_series(envelope: SeriesEnvelope, options: &LineOptions) -> SeriesSpec {
    SeriesSpec {
        smooth: true,
        show_symbol: false,
        line_width: Some(1.0),
        area_opacity: Some(options.area_opacity),
        ..SeriesSpec::from_envelope(SeriesType::Line, envelope)
    }
}

/// Builds a scatter series.
pub fn scatter_series(envelope: SeriesEnvelope, options: &ScatterOptions) -> SeriesSpec {
    SeriesSpec {
        symbol_size: Some(options.symbol_size),
        opacity: Some(options.opacity),
        ..SeriesSpec::from_envelope(SeriesType::Scatter, envelope)
    }
}

/// Builds a pie series.
pub fn pie_series(envelope: SeriesEnvelope, options: &PieOptions) -> SeriesSpec {
    SeriesSpec {
        radius: Some((options.inner_radius, options.outer_radius)),
        ..SeriesSpec::from_envelope(SeriesType::Pie, envelope)
    }
}

/// Builds the error-whisker overlay series drawn by `renderer`.
///
/// The overlay paints above the bars it annotates.
pub fn error_whisker_series(
    name: impl Into<String>,
    data: &[ErrorWhiskerDatum],
    renderer: ErrorWhiskerRenderer,
) -> SeriesSpec {
    let data = data.iter().copied().map(SeriesDatum::Whisker).collect();
    SeriesSpec {
        render_item: Some(renderer),
        z: crate::whisker::WHISKER_Z,
        ..SeriesSpec::from_envelope(SeriesType::Custom, SeriesEnvelope::new(name, data))
    }
    .with_animation(false)
}

fn group_with(
    segments: &[SegmentValues],
    color: ColorFn<'_>,
    animation: bool,
    build: impl Fn(SeriesEnvelope) -> SeriesSpec,
) -> Vec<SeriesSpec> {
    segments
        .iter()
        .map(|s| {
            let envelope = SeriesEnvelope::new(s.segment.clone(), series_data(&s.values))
                .with_color(color(&s.segment))
                .with_animation(animation);
            build(envelope)
        })
        .collect()
}

/// One bar series per segment, side by side.
pub fn bar_series_group(
    segments: &[SegmentValues],
    color: ColorFn<'_>,
    options: &BarOptions,
    animation: bool,
) -> Vec<SeriesSpec> {
    group_with(segments, color, animation, |e| bar_series(e, options))
}

/// One bar series per segment, all stacked under `stack_key` (default `"total"`).
pub fn stacked_bar_series_group(
    segments: &[SegmentValues],
    color: ColorFn<'_>,
    options: &BarOptions,
    stack_key: Option<&str>,
    animation: bool,
) -> Vec<SeriesSpec> {
    let key = stack_key.unwrap_or(DEFAULT_STACK_KEY);
    group_with(segments, color, animation, |e| {
        bar_series(e, options).with_stack(key)
    })
}

/// One line series per segment.
pub fn line_series_group(
    segments: &[SegmentValues],
    color: ColorFn<'_>,
    options: &LineOptions,
    animation: bool,
) -> Vec<SeriesSpec> {
    group_with(segments, color, animation, |e| line_series(e, options))
}

/// One area series per segment, overlapping.
pub fn area_series_group(
    segments: &[SegmentValues],
    color: ColorFn<'_>,
    options: &LineOptions,
    animation: bool,
) -> Vec<SeriesSpec> {
    group_with(segments, color, animation, |e| area_series(e, options))
}

/// One area series per segment, all stacked under `stack_key` (default `"total"`).
pub fn stacked_area_series_group(
    segments: &[SegmentValues],
    color: ColorFn<'_>,
    options: &LineOptions,
    stack_key: Option<&str>,
    animation: bool,
) -> Vec<SeriesSpec> {
    let key = stack_key.unwrap_or(DEFAULT_STACK_KEY);
    group_with(segments, color, animation, |e| {
        area_series(e, options).with_stack(key)
    })
}

/// One scatter series per segment, from `(x, y)` points.
pub fn scatter_series_group(
    segments: &[(String, Vec<(f64, f64)>)],
    color: ColorFn<'_>,
    options: &ScatterOptions,
    animation: bool,
) -> Vec<SeriesSpec> {
    segments
        .iter()
        .map(|(name, points)| {
            let data = points
                .iter()
                .map(|&(x, y)| SeriesDatum::Point { x, y })
                .collect();
            let envelope = SeriesEnvelope::new(name.clone(), data)
                .with_color(color(name))
                .with_animation(animation);
            scatter_series(envelope, options)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(segment: &str) -> String {
        match segment {
            "S1" => String::from("#111111"),
            _ => String::from("#222222"),
        }
    }

    fn segments() -> Vec<SegmentValues> {
        alloc::vec![
            SegmentValues::new("S1", alloc::vec![Some(10.0), Some(20.0)]),
            SegmentValues::new("S2", alloc::vec![Some(15.0), None]),
        ]
    }

    #[test]
    fn grouped_family_never_stacks() {
        let series = bar_series_group(&segments(), &palette, &BarOptions::default(), true);
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|s| s.stack.is_none()));
        assert_eq!(series[0].name, "S1");
        assert_eq!(series[0].color.as_deref(), Some("#111111"));
        assert_eq!(series[1].color.as_deref(), Some("#222222"));
        assert_eq!(series[1].data, [SeriesDatum::Value(15.0), SeriesDatum::Null]);
    }

    #[test]
    fn stacked_family_shares_one_key() {
        let bars =
            stacked_bar_series_group(&segments(), &palette, &BarOptions::default(), None, true);
        assert!(bars.iter().all(|s| s.stack.as_deref() == Some("total")));

        let areas = stacked_area_series_group(
            &segments(),
            &palette,
            &LineOptions::default(),
            Some("people"),
            false,
        );
        assert!(areas.iter().all(|s| s.stack.as_deref() == Some("people")));
        assert!(areas.iter().all(|s| !s.animation));
    }

    #[test]
    fn area_is_a_filled_smooth_line_without_markers() {
        let options = LineOptions {
            smooth: false,
            show_symbol: true,
            line_width: Some(4.0),
            ..LineOptions::default()
        };
        let area = area_series(SeriesEnvelope::new("a", Vec::new()), &options);
        assert_eq!(area.series_type, SeriesType::Line);
        assert!(area.smooth);
        assert!(!area.show_symbol);
        assert_eq!(area.line_width, Some(1.0));
        assert_eq!(area.area_opacity, Some(0.3));

        let line = line_series(SeriesEnvelope::new("l", Vec::new()), &options);
        assert_eq!(line.line_width, Some(4.0));
        assert!(line.area_opacity.is_none());
    }

    #[test]
    fn non_finite_values_become_null() {
        assert_eq!(
            series_data(&[Some(1.0), Some(f64::NAN), None]),
            [SeriesDatum::Value(1.0), SeriesDatum::Null, SeriesDatum::Null]
        );
    }
}

// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convenience builder for category (bar) charts.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use cubeviz_core::{FlagAccessor, NumberAccessor, Observation, RangeAccessor, TextAccessor};
use cubeviz_transforms::{
    ErrorWhiskerDatum, SegmentValues, build_error_whisker_data, build_grouped_error_whisker_data,
    category_values, segment_values, unique_in_order,
};

use crate::axis::{AxisSpec, extent_values, value_extent};
use crate::chart_spec::{ChartOptions, ChartSpecification, TooltipSpec, TooltipTrigger};
use crate::safe::PartialBounds;
use crate::series::{
    BarOptions, SeriesDatum, SeriesEnvelope, SeriesSpec, bar_series, bar_series_group,
    error_whisker_series, series_data, stacked_bar_series_group,
};
use crate::tooltip::{TooltipOptions, category_tooltip};
use crate::whisker::{ErrorWhiskerRenderer, Orientation};

/// Formats a category label.
pub type LabelFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How segments of a category share a band.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BarLayout {
    /// One bar per segment, side by side.
    #[default]
    Grouped,
    /// One bar per category, segments stacked under a shared key (`"total"` when `None`).
    Stacked(Option<String>),
}

/// A bar chart over categories, optionally segmented, with optional error whiskers.
///
/// Without a segment accessor the chart has a single series named by
/// [`CategoryChartSpec::value_name`].
#[derive(Clone)]
pub struct CategoryChartSpec {
    /// Category accessor.
    pub category: TextAccessor,
    /// Value accessor.
    pub value: NumberAccessor,
    /// Optional segment accessor.
    pub segment: Option<TextAccessor>,
    /// Explicit category order; first occurrence order when `None`.
    pub categories: Option<Vec<String>>,
    /// Explicit segment order; first occurrence order when `None`.
    pub segments: Option<Vec<String>>,
    /// Grouped or stacked segments.
    pub layout: BarLayout,
    /// Bar direction.
    pub orientation: Orientation,
    /// Colors single-series bars per category instead of per series.
    pub color_by_category: bool,
    /// Error interval presence and range accessors.
    pub error_whiskers: Option<(FlagAccessor, RangeAccessor)>,
    /// Value axis and single-series name.
    pub value_name: String,
    /// Optional category axis name.
    pub category_name: Option<String>,
    /// Optional category label formatter.
    pub label_formatter: Option<LabelFormatter>,
    /// Bar options.
    pub bar: BarOptions,
    /// Tooltip value options.
    pub tooltip: TooltipOptions,
    /// Shared chart options.
    pub options: ChartOptions,
}

impl core::fmt::Debug for CategoryChartSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CategoryChartSpec")
            .field("segment", &self.segment.is_some())
            .field("categories", &self.categories)
            .field("segments", &self.segments)
            .field("layout", &self.layout)
            .field("orientation", &self.orientation)
            .field("color_by_category", &self.color_by_category)
            .field("error_whiskers", &self.error_whiskers.is_some())
            .field("value_name", &self.value_name)
            .field("category_name", &self.category_name)
            .field("label_formatter", &self.label_formatter.is_some())
            .field("bar", &self.bar)
            .field("tooltip", &self.tooltip)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CategoryChartSpec {
    /// Creates a single-series vertical bar chart.
    pub fn new(category: TextAccessor, value: NumberAccessor) -> Self {
        Self {
            category,
            value,
            segment: None,
            categories: None,
            segments: None,
            layout: BarLayout::Grouped,
            orientation: Orientation::Vertical,
            color_by_category: false,
            error_whiskers: None,
            value_name: String::from("Value"),
            category_name: None,
            label_formatter: None,
            bar: BarOptions::default(),
            tooltip: TooltipOptions::default(),
            options: ChartOptions::default(),
        }
    }

    /// Splits each category into segments.
    pub fn with_segment(mut self, segment: TextAccessor) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Fixes the category order.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Fixes the segment order.
    pub fn with_segments(mut self, segments: Vec<String>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Sets grouped or stacked segments.
    pub fn with_layout(mut self, layout: BarLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the bar direction.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Colors single-series bars per category.
    pub fn with_color_by_category(mut self, color_by_category: bool) -> Self {
        self.color_by_category = color_by_category;
        self
    }

    /// Overlays error whiskers for observations flagged by `present`.
    pub fn with_error_whiskers(mut self, present: FlagAccessor, range: RangeAccessor) -> Self {
        self.error_whiskers = Some((present, range));
        self
    }

    /// Sets the value axis name.
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
        self
    }

    /// Sets the category axis name.
    pub fn with_category_name(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    /// Sets the category label formatter.
    pub fn with_label_formatter(mut self, formatter: LabelFormatter) -> Self {
        self.label_formatter = Some(formatter);
        self
    }

    /// Sets the bar options.
    pub fn with_bar_options(mut self, bar: BarOptions) -> Self {
        self.bar = bar;
        self
    }

    /// Sets the tooltip value options.
    pub fn with_tooltip_options(mut self, tooltip: TooltipOptions) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Sets the shared chart options.
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    fn categories(&self, observations: &[Observation]) -> Vec<String> {
        match &self.categories {
            Some(c) => c.clone(),
            None => unique_in_order(observations, &*self.category),
        }
    }

    fn whisker_rows(
        &self,
        observations: &[Observation],
        categories: &[String],
        segments: Option<&[String]>,
    ) -> Vec<ErrorWhiskerDatum> {
        let Some((present, range)) = &self.error_whiskers else {
            return Vec::new();
        };
        match (&self.segment, segments) {
            (Some(segment), Some(segments)) => build_grouped_error_whisker_data(
                observations,
                categories,
                segments,
                &*self.category,
                &**segment,
                &**present,
                &**range,
            ),
            _ => build_error_whisker_data(
                observations,
                categories,
                &*self.category,
                &**present,
                &**range,
            ),
        }
    }

    /// Compiles the chart.
    pub fn compile(
        &self,
        observations: &[Observation],
        bounds: Option<&PartialBounds>,
    ) -> ChartSpecification {
        let categories = self.categories(observations);
        let segments: Option<Vec<String>> = self.segment.as_ref().map(|segment| {
            self.segments
                .clone()
                .unwrap_or_else(|| unique_in_order(observations, &**segment))
        });

        let rows: Vec<SegmentValues> = match (&self.segment, &segments) {
            (Some(segment), Some(names)) => segment_values(
                observations,
                &categories,
                names,
                &*self.category,
                &**segment,
                &*self.value,
            ),
            _ => vec![SegmentValues::new(
                self.value_name.clone(),
                category_values(observations, &categories, &*self.category, &*self.value),
            )],
        };
        let whiskers = self.whisker_rows(observations, &categories, segments.as_deref());

        let mut frame = self.options.frame(
            bounds,
            categories.len() * rows.len(),
            &categories,
        );

        let mut series = match &segments {
            Some(names) => {
                let colors = self.options.color_fn(names);
                match &self.layout {
                    BarLayout::Grouped => {
                        bar_series_group(&rows, &*colors, &self.bar, self.options.animation)
                    }
                    BarLayout::Stacked(key) => stacked_bar_series_group(
                        &rows,
                        &*colors,
                        &self.bar,
                        key.as_deref(),
                        self.options.animation,
                    ),
                }
            }
            None => self.single_series(&rows, &categories),
        };

        let stacked = segments.is_some() && matches!(self.layout, BarLayout::Stacked(_));
        let (min, max) = value_extent(
            extent_values(&rows, stacked).chain(whiskers.iter().flat_map(|w| [w.low, w.high])),
            true,
        );

        if !whiskers.is_empty() {
            let renderer = ErrorWhiskerRenderer::new(self.orientation);
            series.push(error_whisker_series("Error", &whiskers, renderer));
        }

        let legend_names = segments.clone().unwrap_or_default();
        let legend = self.options.legend(legend_names, &mut frame);

        let formatter = self
            .label_formatter
            .as_ref()
            .map(|f| &**f as &dyn Fn(&str) -> String);
        let mut category_axis = AxisSpec::category(&categories, formatter)
            .with_label_font_size(frame.layout.font_sizes.axis_label);
        if let Some(name) = &self.category_name {
            category_axis = category_axis.with_name(name.clone());
        }
        let value_axis = AxisSpec::value(min, max)
            .with_name(self.value_name.clone())
            .with_label_font_size(frame.layout.font_sizes.axis_label);

        let (x_axis, y_axis) = match self.orientation {
            Orientation::Vertical => (
                category_axis.with_label_rotation(frame.layout.label_rotation),
                value_axis,
            ),
            Orientation::Horizontal => {
                let widest = category_axis
                    .data
                    .iter()
                    .map(|l| {
                        self.options
                            .measurer
                            .measure(l, frame.layout.font_sizes.axis_label)
                            .0
                    })
                    .fold(0.0_f64, f64::max);
                frame.grid.left = frame.grid.left.max(widest + 8.0);
                (value_axis, category_axis)
            }
        };

        let tooltip = TooltipSpec::new(TooltipTrigger::Axis, category_tooltip(self.tooltip.clone()));
        log::debug!(
            "compiled category chart: {} categories, {} series",
            categories.len(),
            series.len()
        );
        frame.finish(
            &self.options,
            vec![x_axis],
            vec![y_axis],
            series,
            legend,
            tooltip,
        )
    }

    fn single_series(&self, rows: &[SegmentValues], categories: &[String]) -> Vec<SeriesSpec> {
        let Some(row) = rows.first() else {
            return Vec::new();
        };
        let (data, color) = if self.color_by_category {
            let colors = self.options.color_fn(categories);
            let data = row
                .values
                .iter()
                .zip(categories)
                .map(|(v, c)| match v.filter(|v| v.is_finite()) {
                    Some(value) => SeriesDatum::Styled {
                        value,
                        color: colors(c),
                    },
                    None => SeriesDatum::Null,
                })
                .collect();
            (data, None)
        } else {
            let colors = self.options.color_fn(&[self.value_name.as_str()]);
            (series_data(&row.values), Some(colors(&self.value_name)))
        };
        let mut envelope = SeriesEnvelope::new(row.segment.clone(), data)
            .with_animation(self.options.animation);
        if let Some(color) = color {
            envelope = envelope.with_color(color);
        }
        vec![bar_series(envelope, &self.bar)]
    }
}

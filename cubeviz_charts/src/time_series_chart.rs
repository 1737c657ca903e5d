// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convenience builder for time series charts: lines, areas, and stacked areas.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use cubeviz_core::{NumberAccessor, Observation, TextAccessor, TimeAccessor};
use cubeviz_transforms::{SegmentValues, TimeSeriesGrouping};

use crate::axis::{AxisSpec, extent_values, value_extent};
use crate::chart_spec::{ChartOptions, ChartSpecification, TooltipSpec, TooltipTrigger};
use crate::safe::PartialBounds;
use crate::series::{LineOptions, area_series_group, line_series_group, stacked_area_series_group};
use crate::time::{format_time_labels, infer_granularity};
use crate::tooltip::{TooltipOptions, time_series_tooltip};

/// How series are drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TimeSeriesKind {
    /// Lines.
    #[default]
    Line,
    /// Overlapping filled areas.
    Area,
    /// Areas stacked under a shared key (`"total"` when `None`).
    StackedArea(Option<String>),
}

/// A time series chart over a global, sorted timestamp axis.
///
/// Every series holds one entry per timestamp; a segment without a value at a timestamp gets a
/// gap there.
#[derive(Clone)]
pub struct TimeSeriesChartSpec {
    /// Timestamp accessor.
    pub x: TimeAccessor,
    /// Value accessor.
    pub y: NumberAccessor,
    /// Optional segment accessor.
    pub segment: Option<TextAccessor>,
    /// Explicit segment order.
    pub segments: Option<Vec<String>>,
    /// Drawing kind.
    pub kind: TimeSeriesKind,
    /// Line options.
    pub line: LineOptions,
    /// Value axis and single-series name.
    pub value_name: String,
    /// Tooltip value options; the granularity is inferred from the data.
    pub tooltip: TooltipOptions,
    /// Shared chart options.
    pub options: ChartOptions,
}

impl core::fmt::Debug for TimeSeriesChartSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimeSeriesChartSpec")
            .field("segment", &self.segment.is_some())
            .field("segments", &self.segments)
            .field("kind", &self.kind)
            .field("line", &self.line)
            .field("value_name", &self.value_name)
            .field("tooltip", &self.tooltip)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TimeSeriesChartSpec {
    /// Creates a single-line chart.
    pub fn new(x: TimeAccessor, y: NumberAccessor) -> Self {
        Self {
            x,
            y,
            segment: None,
            segments: None,
            kind: TimeSeriesKind::Line,
            line: LineOptions::default(),
            value_name: String::from("Value"),
            tooltip: TooltipOptions::default(),
            options: ChartOptions::default(),
        }
    }

    /// Splits observations into one series per segment.
    pub fn with_segment(mut self, segment: TextAccessor) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Fixes the segment order.
    pub fn with_segments(mut self, segments: Vec<String>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Sets the drawing kind.
    pub fn with_kind(mut self, kind: TimeSeriesKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the line options.
    pub fn with_line_options(mut self, line: LineOptions) -> Self {
        self.line = line;
        self
    }

    /// Sets the value axis name.
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
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

    fn grouping(&self) -> TimeSeriesGrouping {
        let mut grouping = TimeSeriesGrouping::new(self.x.clone(), self.y.clone());
        if let Some(segment) = &self.segment {
            grouping = grouping.with_segment(segment.clone());
        }
        if let Some(order) = &self.segments {
            grouping = grouping.with_segment_order(order.clone());
        }
        grouping
    }

    /// Compiles the chart.
    pub fn compile(
        &self,
        observations: &[Observation],
        bounds: Option<&PartialBounds>,
    ) -> ChartSpecification {
        let grouped = self.grouping().group(observations);
        let mut rows: Vec<SegmentValues> = grouped.aligned();
        if self.segment.is_none() {
            for row in &mut rows {
                row.segment.clone_from(&self.value_name);
            }
        }

        let granularity = infer_granularity(&grouped.timestamps);
        let labels = format_time_labels(&grouped.timestamps);
        let mut frame = self.options.frame(bounds, labels.len() * rows.len(), &labels);

        let names: Vec<String> = rows.iter().map(|r| r.segment.clone()).collect();
        let colors = self.options.color_fn(&names);
        let mut line = self.line;
        if line.symbol_size.is_none() {
            line.symbol_size = Some(frame.layout.symbol_size);
        }
        let animation = self.options.animation;
        let (series, stacked, include_zero) = match &self.kind {
            TimeSeriesKind::Line => (
                line_series_group(&rows, &*colors, &line, animation),
                false,
                false,
            ),
            TimeSeriesKind::Area => (
                area_series_group(&rows, &*colors, &line, animation),
                false,
                true,
            ),
            TimeSeriesKind::StackedArea(key) => (
                stacked_area_series_group(&rows, &*colors, &line, key.as_deref(), animation),
                true,
                true,
            ),
        };
        let (min, max) = value_extent(extent_values(&rows, stacked), include_zero);

        let legend = self.options.legend(names, &mut frame);
        let x_axis = AxisSpec::category(&labels, None)
            .with_boundary_gap(false)
            .with_label_rotation(frame.layout.label_rotation)
            .with_label_font_size(frame.layout.font_sizes.axis_label);
        let y_axis = AxisSpec::value(min, max)
            .with_name(self.value_name.clone())
            .with_label_font_size(frame.layout.font_sizes.axis_label);

        let tooltip = TooltipSpec::new(
            TooltipTrigger::Axis,
            time_series_tooltip(self.tooltip.clone().with_granularity(granularity)),
        );
        log::debug!(
            "compiled time series chart: {} timestamps at {granularity:?}, {} series",
            grouped.timestamps.len(),
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
}

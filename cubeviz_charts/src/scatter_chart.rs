// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convenience builder for scatter charts.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use cubeviz_core::{NumberAccessor, Observation, TextAccessor};
use cubeviz_transforms::unique_in_order;

use crate::axis::{AxisSpec, value_extent};
use crate::chart_spec::{ChartOptions, ChartSpecification, TooltipSpec, TooltipTrigger};
use crate::safe::PartialBounds;
use crate::series::{ScatterOptions, scatter_series_group};
use crate::tooltip::{TooltipOptions, scatter_tooltip};

/// Points grouped by segment, in segment order.
pub type ScatterGroups = Vec<(String, Vec<(f64, f64)>)>;

/// A scatter chart of `(x, y)` observations, optionally split into segments.
#[derive(Clone)]
pub struct ScatterChartSpec {
    /// Horizontal value accessor.
    pub x: NumberAccessor,
    /// Vertical value accessor.
    pub y: NumberAccessor,
    /// Optional segment accessor.
    pub segment: Option<TextAccessor>,
    /// Explicit segment order; observations in other segments are dropped.
    pub segments: Option<Vec<String>>,
    /// Horizontal axis name.
    pub x_name: String,
    /// Vertical axis name, and the single series name when unsegmented.
    pub y_name: String,
    /// Fixed symbol size; sized by container width and point count when `None`.
    pub symbol_size: Option<f64>,
    /// Symbol opacity.
    pub opacity: f64,
    /// Tooltip value options.
    pub tooltip: TooltipOptions,
    /// Shared chart options.
    pub options: ChartOptions,
}

impl core::fmt::Debug for ScatterChartSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScatterChartSpec")
            .field("segment", &self.segment.is_some())
            .field("segments", &self.segments)
            .field("x_name", &self.x_name)
            .field("y_name", &self.y_name)
            .field("symbol_size", &self.symbol_size)
            .field("opacity", &self.opacity)
            .field("tooltip", &self.tooltip)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ScatterChartSpec {
    /// Creates a single-series scatter chart.
    pub fn new(x: NumberAccessor, y: NumberAccessor) -> Self {
        Self {
            x,
            y,
            segment: None,
            segments: None,
            x_name: String::from("X"),
            y_name: String::from("Y"),
            symbol_size: None,
            opacity: ScatterOptions::default().opacity,
            tooltip: TooltipOptions::default(),
            options: ChartOptions::default(),
        }
    }

    /// Splits points into one series per segment.
    pub fn with_segment(mut self, segment: TextAccessor) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Fixes the segment order.
    pub fn with_segments(mut self, segments: Vec<String>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Sets both axis names.
    pub fn with_axis_names(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_name = x.into();
        self.y_name = y.into();
        self
    }

    /// Fixes the symbol size.
    pub fn with_symbol_size(mut self, size: f64) -> Self {
        self.symbol_size = Some(size);
        self
    }

    /// Sets the symbol opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
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

    /// Groups finite `(x, y)` points by segment. Observations missing either value are skipped.
    pub fn points(&self, observations: &[Observation]) -> ScatterGroups {
        let keys = match (&self.segment, &self.segments) {
            (None, _) => vec![self.y_name.clone()],
            (Some(_), Some(order)) => order.clone(),
            (Some(segment), None) => unique_in_order(observations, &**segment),
        };
        let index: HashMap<&str, usize> = keys
            .iter()
            .enumerate()
            .rev()
            .map(|(i, k)| (k.as_str(), i))
            .collect();
        let mut groups: ScatterGroups = keys.iter().map(|k| (k.clone(), Vec::new())).collect();
        for d in observations {
            let (Some(x), Some(y)) = ((self.x)(d), (self.y)(d)) else {
                continue;
            };
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let slot = match &self.segment {
                None => Some(0),
                Some(segment) => segment(d).and_then(|s| index.get(s.as_str()).copied()),
            };
            if let Some(i) = slot {
                groups[i].1.push((x, y));
            }
        }
        groups
    }

    /// Compiles the chart.
    pub fn compile(
        &self,
        observations: &[Observation],
        bounds: Option<&PartialBounds>,
    ) -> ChartSpecification {
        let groups = self.points(observations);
        let point_count = groups.iter().map(|(_, p)| p.len()).sum();
        let no_labels: [&str; 0] = [];
        let mut frame = self.options.frame(bounds, point_count, &no_labels);

        let names: Vec<String> = groups.iter().map(|(n, _)| n.clone()).collect();
        let colors = self.options.color_fn(&names);
        let options = ScatterOptions {
            symbol_size: self.symbol_size.unwrap_or(frame.layout.symbol_size),
            opacity: self.opacity,
        };
        let series = scatter_series_group(&groups, &*colors, &options, self.options.animation);

        let points = || groups.iter().flat_map(|(_, p)| p.iter());
        let (x_min, x_max) = value_extent(points().map(|p| p.0), false);
        let (y_min, y_max) = value_extent(points().map(|p| p.1), false);
        let font_size = frame.layout.font_sizes.axis_label;
        let x_axis = AxisSpec::value(x_min, x_max)
            .with_name(self.x_name.clone())
            .with_label_font_size(font_size);
        let y_axis = AxisSpec::value(y_min, y_max)
            .with_name(self.y_name.clone())
            .with_label_font_size(font_size);

        let legend = self.options.legend(names, &mut frame);
        let tooltip = TooltipSpec::new(
            TooltipTrigger::Item,
            scatter_tooltip(self.x_name.clone(), self.y_name.clone(), self.tooltip.clone()),
        );
        log::debug!(
            "compiled scatter chart: {point_count} points in {} series, symbol size {}",
            series.len(),
            options.symbol_size
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

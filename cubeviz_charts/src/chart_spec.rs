// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compiled chart specification.
//!
//! A [`ChartSpecification`] is a plain value: axes, series, grid, legend, tooltip and resolved
//! dimensions, consumable by any rendering engine that accepts this shape. It is rebuilt from
//! scratch on every render pass and never mutated after construction.
//!
//! This module also holds [`ChartOptions`], the settings every chart compiler shares.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_json::Value as Json;

use crate::axis::{AxisSpec, AxisType};
use crate::layout::{Bounds, Grid, HeuristicTextMeasurer, Margins, TextMeasurer};
use crate::legend::LegendSpec;
use crate::palette::{SharedColorFn, categorical_colors};
use crate::responsive::{ResponsiveConfig, ResponsiveLayout};
use crate::safe::{PartialBounds, safe_bounds};
use crate::series::SeriesSpec;
use crate::tooltip::TooltipFormatter;
use crate::validate::{ValidationReport, validate_axis_domain, validate_series_values};

/// What triggers the tooltip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TooltipTrigger {
    /// Hovering a category or time position; every series at that position is listed.
    #[default]
    Axis,
    /// Hovering a single item.
    Item,
    /// No tooltip.
    None,
}

/// Tooltip configuration.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TooltipSpec {
    /// Trigger mode.
    pub trigger: TooltipTrigger,
    /// Formatter the engine calls with its tooltip payload.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub formatter: Option<TooltipFormatter>,
}

impl core::fmt::Debug for TooltipSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TooltipSpec")
            .field("trigger", &self.trigger)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl TooltipSpec {
    /// A tooltip with a trigger and formatter.
    pub fn new(trigger: TooltipTrigger, formatter: TooltipFormatter) -> Self {
        Self {
            trigger,
            formatter: Some(formatter),
        }
    }
}

/// A fully resolved chart.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartSpecification {
    /// Optional chart title.
    pub title: Option<String>,
    /// Horizontal axes.
    pub x_axis: Vec<AxisSpec>,
    /// Vertical axes.
    pub y_axis: Vec<AxisSpec>,
    /// Series, in paint order before `z`.
    pub series: Vec<SeriesSpec>,
    /// Plot placement.
    pub grid: Grid,
    /// Legend.
    pub legend: LegendSpec,
    /// Tooltip.
    pub tooltip: TooltipSpec,
    /// Resolved container width.
    pub width: f64,
    /// Resolved chart height.
    pub height: f64,
    /// Whether the engine animates the chart.
    pub animation: bool,
    /// The responsive numbers the chart was built with.
    pub layout: ResponsiveLayout,
}

impl ChartSpecification {
    /// Formats an engine tooltip payload; empty without a formatter.
    pub fn format_tooltip(&self, payload: &Json) -> String {
        match &self.tooltip.formatter {
            Some(f) => f(payload),
            None => String::new(),
        }
    }

    /// Checks value axis domains and every series' values.
    pub fn validate(&self) -> ValidationReport {
        let axes = self
            .x_axis
            .iter()
            .chain(&self.y_axis)
            .filter(|a| a.axis_type != AxisType::Category)
            .filter_map(|a| Some(validate_axis_domain(a.min?, a.max?)));
        let series = self.series.iter().map(|s| {
            let values: Vec<Option<f64>> = s.data.iter().map(|d| d.value()).collect();
            validate_series_values(&s.name, &values)
        });
        axes.chain(series)
            .fold(ValidationReport::new(), ValidationReport::merge)
    }
}

/// Settings shared by every chart compiler.
#[derive(Clone)]
pub struct ChartOptions {
    /// Optional chart title.
    pub title: Option<String>,
    /// Whether breakpoint margins replace the bounds margins.
    pub responsive: bool,
    /// Breakpoint tables.
    pub responsive_config: ResponsiveConfig,
    /// Whether the engine animates the chart.
    pub animation: bool,
    /// Whether a legend is shown when there are several series.
    pub show_legend: bool,
    /// Segment or category colors; the default palette when `None`.
    pub colors: Option<SharedColorFn>,
    /// Text measurer used for guide sizing.
    pub measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl core::fmt::Debug for ChartOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChartOptions")
            .field("title", &self.title)
            .field("responsive", &self.responsive)
            .field("responsive_config", &self.responsive_config)
            .field("animation", &self.animation)
            .field("show_legend", &self.show_legend)
            .field("colors", &self.colors.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: None,
            responsive: true,
            responsive_config: ResponsiveConfig::default(),
            animation: true,
            show_legend: true,
            colors: None,
            measurer: Arc::new(HeuristicTextMeasurer),
        }
    }
}

impl ChartOptions {
    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enables or disables breakpoint margins.
    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = responsive;
        self
    }

    /// Replaces the breakpoint tables.
    pub fn with_responsive_config(mut self, config: ResponsiveConfig) -> Self {
        self.responsive_config = config;
        self
    }

    /// Enables or disables animation.
    pub fn with_animation(mut self, animation: bool) -> Self {
        self.animation = animation;
        self
    }

    /// Shows or hides the legend.
    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    /// Sets the color function.
    pub fn with_colors(mut self, colors: SharedColorFn) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Sets the text measurer.
    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.measurer = measurer;
        self
    }

    /// The configured color function, or palette colors assigned to `keys` in order.
    pub(crate) fn color_fn<S: AsRef<str>>(&self, keys: &[S]) -> SharedColorFn {
        match &self.colors {
            Some(c) => c.clone(),
            None => categorical_colors(keys),
        }
    }

    /// Resolves bounds and the responsive layout in one pass.
    pub(crate) fn frame<S: AsRef<str>>(
        &self,
        bounds: Option<&PartialBounds>,
        point_count: usize,
        labels: &[S],
    ) -> Frame {
        let bounds = safe_bounds(bounds);
        let layout =
            ResponsiveLayout::resolve(&self.responsive_config, bounds.width, point_count, labels);
        let margins = if self.responsive {
            layout.margins
        } else {
            bounds.margins
        };
        Frame {
            bounds,
            layout,
            margins,
            grid: Grid::from_margins(margins),
        }
    }

    /// A legend over `names`, shown when enabled and there are several names.
    pub(crate) fn legend(&self, names: Vec<String>, frame: &mut Frame) -> LegendSpec {
        let legend = LegendSpec::new(names)
            .with_font_size(frame.layout.font_sizes.legend);
        let legend = if self.show_legend {
            legend
        } else {
            legend.with_show(false)
        };
        frame.grid.top += legend.extra_top(frame.bounds.width, &*self.measurer);
        legend
    }
}

/// Resolved bounds, responsive layout, and grid for one compile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub(crate) bounds: Bounds,
    pub(crate) layout: ResponsiveLayout,
    pub(crate) margins: Margins,
    pub(crate) grid: Grid,
}

impl Frame {
    /// Assembles the specification.
    pub(crate) fn finish(
        self,
        options: &ChartOptions,
        x_axis: Vec<AxisSpec>,
        y_axis: Vec<AxisSpec>,
        series: Vec<SeriesSpec>,
        legend: LegendSpec,
        tooltip: TooltipSpec,
    ) -> ChartSpecification {
        ChartSpecification {
            title: options.title.clone(),
            x_axis,
            y_axis,
            series,
            grid: self.grid,
            legend,
            tooltip,
            width: self.bounds.width,
            height: self.bounds.chart_height,
            animation: options.animation,
            layout: self.layout,
        }
    }
}

// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convenience builder for dual-axis combo charts: bars on the left axis, a line on the right.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use cubeviz_core::{NumberAccessor, Observation, TextAccessor};
use cubeviz_transforms::{category_values, unique_in_order};

use crate::axis::{AxisSide, AxisSpec, DualAxisSpec, dual_value_axes, value_extent};
use crate::chart_spec::{ChartOptions, ChartSpecification, TooltipSpec, TooltipTrigger};
use crate::layout::{Grid, right_axis_label_width};
use crate::palette::palette_color;
use crate::safe::PartialBounds;
use crate::series::{BarOptions, LineOptions, SeriesEnvelope, bar_series, line_series, series_data};
use crate::tooltip::{TooltipOptions, dual_axis_tooltip};

/// Number of right axis ticks used to size the right margin.
const RIGHT_TICK_COUNT: usize = 5;

/// Position of the line series, the only series on the right axis.
const LINE_SERIES_INDEX: usize = 1;

/// A bar series and a line series sharing a category axis, each with its own value axis.
#[derive(Clone)]
pub struct ComboChartSpec {
    /// Category accessor.
    pub category: TextAccessor,
    /// Bar value accessor, plotted on the left axis.
    pub bar_value: NumberAccessor,
    /// Line value accessor, plotted on the right axis.
    pub line_value: NumberAccessor,
    /// Bar series and left axis name.
    pub bar_name: String,
    /// Line series and right axis name.
    pub line_name: String,
    /// Explicit category order.
    pub categories: Option<Vec<String>>,
    /// Bar options.
    pub bar: BarOptions,
    /// Line options.
    pub line: LineOptions,
    /// Tooltip options for bar values.
    pub left_tooltip: TooltipOptions,
    /// Tooltip options for line values.
    pub right_tooltip: TooltipOptions,
    /// Shared chart options.
    pub options: ChartOptions,
}

impl core::fmt::Debug for ComboChartSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComboChartSpec")
            .field("bar_name", &self.bar_name)
            .field("line_name", &self.line_name)
            .field("categories", &self.categories)
            .field("bar", &self.bar)
            .field("line", &self.line)
            .field("left_tooltip", &self.left_tooltip)
            .field("right_tooltip", &self.right_tooltip)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ComboChartSpec {
    /// Creates a combo chart.
    pub fn new(
        category: TextAccessor,
        bar_value: NumberAccessor,
        line_value: NumberAccessor,
    ) -> Self {
        Self {
            category,
            bar_value,
            line_value,
            bar_name: String::from("Bars"),
            line_name: String::from("Line"),
            categories: None,
            bar: BarOptions::default(),
            line: LineOptions::default(),
            left_tooltip: TooltipOptions::default(),
            right_tooltip: TooltipOptions::default(),
            options: ChartOptions::default(),
        }
    }

    /// Names the bar series and left axis.
    pub fn with_bar_name(mut self, name: impl Into<String>) -> Self {
        self.bar_name = name.into();
        self
    }

    /// Names the line series and right axis.
    pub fn with_line_name(mut self, name: impl Into<String>) -> Self {
        self.line_name = name.into();
        self
    }

    /// Fixes the category order.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the bar options.
    pub fn with_bar_options(mut self, bar: BarOptions) -> Self {
        self.bar = bar;
        self
    }

    /// Sets the line options.
    pub fn with_line_options(mut self, line: LineOptions) -> Self {
        self.line = line;
        self
    }

    /// Sets per-axis tooltip options.
    pub fn with_tooltip_options(mut self, left: TooltipOptions, right: TooltipOptions) -> Self {
        self.left_tooltip = left;
        self.right_tooltip = right;
        self
    }

    /// Sets the shared chart options.
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Compiles the chart.
    pub fn compile(
        &self,
        observations: &[Observation],
        bounds: Option<&PartialBounds>,
    ) -> ChartSpecification {
        let categories = match &self.categories {
            Some(c) => c.clone(),
            None => unique_in_order(observations, &*self.category),
        };
        let bars = category_values(observations, &categories, &*self.category, &*self.bar_value);
        let line = category_values(observations, &categories, &*self.category, &*self.line_value);

        let mut frame = self.options.frame(bounds, categories.len() * 2, &categories);
        let names = vec![self.bar_name.clone(), self.line_name.clone()];
        let (bar_color, line_color) = match &self.options.colors {
            Some(colors) => (colors(&self.bar_name), colors(&self.line_name)),
            None => (palette_color(0), palette_color(1)),
        };

        let (left_min, left_max) = value_extent(bars.iter().flatten().copied(), true);
        let (right_min, right_max) = value_extent(line.iter().flatten().copied(), false);
        let [left_axis, right_axis] = dual_value_axes(&DualAxisSpec {
            left: AxisSide::new(self.bar_name.clone(), left_min, left_max)
                .with_color(bar_color.clone()),
            right: AxisSide::new(self.line_name.clone(), right_min, right_max)
                .with_color(line_color.clone()),
        });
        let font_size = frame.layout.font_sizes.axis_label;
        let left_axis = left_axis.with_label_font_size(font_size);
        let right_axis = right_axis.with_label_font_size(font_size);

        let right_labels = right_axis.tick_labels(RIGHT_TICK_COUNT);
        let right_labels: Vec<&str> = right_labels.iter().map(String::as_str).collect();
        let extra_right = right_axis_label_width(&right_labels, font_size, &*self.options.measurer);
        frame.grid = Grid::combo(frame.margins, extra_right);

        let animation = self.options.animation;
        let mut line_options = self.line;
        if line_options.symbol_size.is_none() {
            line_options.symbol_size = Some(frame.layout.symbol_size);
        }
        let series = vec![
            bar_series(
                SeriesEnvelope::new(self.bar_name.clone(), series_data(&bars))
                    .with_color(bar_color)
                    .with_animation(animation),
                &self.bar,
            ),
            line_series(
                SeriesEnvelope::new(self.line_name.clone(), series_data(&line))
                    .with_color(line_color)
                    .with_animation(animation),
                &line_options,
            )
            .with_y_axis_index(1),
        ];

        let legend = self.options.legend(names, &mut frame);
        let x_axis = AxisSpec::category(&categories, None)
            .with_label_rotation(frame.layout.label_rotation)
            .with_label_font_size(font_size);
        let tooltip = TooltipSpec::new(
            TooltipTrigger::Axis,
            dual_axis_tooltip(
                self.left_tooltip.clone(),
                self.right_tooltip.clone(),
                &[LINE_SERIES_INDEX],
            ),
        );
        log::debug!(
            "compiled combo chart: {} categories, right margin +{extra_right}",
            categories.len()
        );
        frame.finish(
            &self.options,
            vec![x_axis],
            vec![left_axis, right_axis],
            series,
            legend,
            tooltip,
        )
    }
}

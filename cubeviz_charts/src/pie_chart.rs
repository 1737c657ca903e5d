// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convenience builder for pie and donut charts.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use cubeviz_core::{NumberAccessor, Observation, TextAccessor};
use cubeviz_transforms::{category_values, unique_in_order};

use crate::chart_spec::{ChartOptions, ChartSpecification, TooltipSpec, TooltipTrigger};
use crate::safe::PartialBounds;
use crate::series::{PieOptions, SeriesDatum, SeriesEnvelope, pie_series};
use crate::tooltip::{TooltipOptions, pie_tooltip};

/// A pie chart with one slice per category.
///
/// Categories with a missing, non-finite, or negative value get no slice.
#[derive(Clone)]
pub struct PieChartSpec {
    /// Slice name accessor.
    pub category: TextAccessor,
    /// Slice value accessor.
    pub value: NumberAccessor,
    /// Explicit slice order.
    pub categories: Option<Vec<String>>,
    /// Series name.
    pub name: String,
    /// Radii.
    pub pie: PieOptions,
    /// Tooltip value options.
    pub tooltip: TooltipOptions,
    /// Shared chart options.
    pub options: ChartOptions,
}

impl core::fmt::Debug for PieChartSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PieChartSpec")
            .field("categories", &self.categories)
            .field("name", &self.name)
            .field("pie", &self.pie)
            .field("tooltip", &self.tooltip)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PieChartSpec {
    /// Creates a pie chart.
    pub fn new(category: TextAccessor, value: NumberAccessor) -> Self {
        Self {
            category,
            value,
            categories: None,
            name: String::from("Value"),
            pie: PieOptions::default(),
            tooltip: TooltipOptions::default(),
            options: ChartOptions::default(),
        }
    }

    /// Fixes the slice order.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the series name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Makes a donut with the given inner radius fraction.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.pie.inner_radius = inner_radius;
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
        let values = category_values(observations, &categories, &*self.category, &*self.value);
        let slices: Vec<(String, f64)> = categories
            .into_iter()
            .zip(values)
            .filter_map(|(name, v)| v.filter(|v| v.is_finite() && *v >= 0.0).map(|v| (name, v)))
            .collect();

        let names: Vec<String> = slices.iter().map(|(n, _)| n.clone()).collect();
        let mut frame = self.options.frame(bounds, slices.len(), &names);
        let colors = self.options.color_fn(&names);
        let data = slices
            .into_iter()
            .map(|(name, value)| SeriesDatum::Named {
                color: Some(colors(&name)),
                name,
                value,
            })
            .collect();
        let series = vec![pie_series(
            SeriesEnvelope::new(self.name.clone(), data).with_animation(self.options.animation),
            &self.pie,
        )];

        let legend = self.options.legend(names, &mut frame);
        let tooltip = TooltipSpec::new(TooltipTrigger::Item, pie_tooltip(self.tooltip.clone()));
        frame.finish(
            &self.options,
            Vec::new(),
            Vec::new(),
            series,
            legend,
            tooltip,
        )
    }
}

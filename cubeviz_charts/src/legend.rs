// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend descriptors.
//!
//! A legend lists series names with a color swatch each. The rendering engine draws it; this
//! module only decides the entries and placement, and estimates how many rows a horizontal
//! legend wraps into so the plot can make room for it.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::layout::TextMeasurer;

/// Legend item flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LegendOrient {
    /// Items flow left to right and wrap.
    #[default]
    Horizontal,
    /// Items stack top to bottom.
    Vertical,
}

/// Legend placement relative to the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LegendPosition {
    /// Above the plot.
    #[default]
    Top,
    /// Below the plot.
    Bottom,
    /// Right of the plot.
    Right,
}

/// A legend descriptor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegendSpec {
    /// Whether the legend is shown.
    pub show: bool,
    /// Entry names in display order.
    pub data: Vec<String>,
    /// Item flow.
    pub orient: LegendOrient,
    /// Placement.
    pub position: LegendPosition,
    /// Label font size.
    pub font_size: f64,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Gap between items.
    pub item_gap: f64,
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self {
            show: false,
            data: Vec::new(),
            orient: LegendOrient::Horizontal,
            position: LegendPosition::Top,
            font_size: 12.0,
            swatch_size: 10.0,
            label_dx: 6.0,
            item_gap: 12.0,
        }
    }
}

impl LegendSpec {
    /// A shown legend over `names`.
    ///
    /// A single entry adds nothing over the axis name, so the legend is hidden then.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            show: names.len() > 1,
            data: names,
            ..Self::default()
        }
    }

    /// Sets visibility.
    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Sets the item flow.
    pub fn with_orient(mut self, orient: LegendOrient) -> Self {
        self.orient = orient;
        self
    }

    /// Sets the placement.
    pub fn with_position(mut self, position: LegendPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    fn row_height(&self) -> f64 {
        self.swatch_size.max(self.font_size)
    }

    /// Number of rows the legend occupies within `available_width`.
    ///
    /// Horizontal legends pack items greedily and wrap; vertical legends use one row per item.
    /// A hidden or empty legend has zero rows.
    pub fn rows(&self, available_width: f64, measurer: &dyn TextMeasurer) -> usize {
        if !self.show || self.data.is_empty() {
            return 0;
        }
        if self.orient == LegendOrient::Vertical {
            return self.data.len();
        }
        let mut rows = 1;
        let mut used = 0.0;
        for name in &self.data {
            let w = self.swatch_size + self.label_dx + measurer.measure(name, self.font_size).0;
            if used > 0.0 && used + self.item_gap + w > available_width {
                rows += 1;
                used = w;
            } else if used > 0.0 {
                used += self.item_gap + w;
            } else {
                used = w;
            }
        }
        rows
    }

    /// Height the legend occupies within `available_width`, including gaps between rows.
    pub fn height(&self, available_width: f64, measurer: &dyn TextMeasurer) -> f64 {
        let rows = self.rows(available_width, measurer);
        if rows == 0 {
            return 0.0;
        }
        let rows = rows as f64;
        rows * self.row_height() + (rows - 1.0) * self.item_gap * 0.5
    }

    /// Extra top margin needed beyond the first legend row, which the default margins already
    /// leave room for.
    pub fn extra_top(&self, available_width: f64, measurer: &dyn TextMeasurer) -> f64 {
        if self.position != LegendPosition::Top {
            return 0.0;
        }
        let height = self.height(available_width, measurer);
        (height - self.row_height()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HeuristicTextMeasurer;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| alloc::format!("Series {i}")).collect()
    }

    #[test]
    fn single_entry_legend_is_hidden() {
        assert!(!LegendSpec::new(names(1)).show);
        assert!(LegendSpec::new(names(2)).show);
        assert_eq!(LegendSpec::new(names(1)).rows(500.0, &HeuristicTextMeasurer), 0);
    }

    #[test]
    fn horizontal_legend_wraps_in_narrow_containers() {
        let m = HeuristicTextMeasurer;
        let legend = LegendSpec::new(names(6));
        let wide = legend.rows(2000.0, &m);
        let narrow = legend.rows(200.0, &m);
        assert_eq!(wide, 1);
        assert!(narrow > wide);
        assert_eq!(legend.extra_top(2000.0, &m), 0.0);
        assert!(legend.extra_top(200.0, &m) > 0.0);
    }

    #[test]
    fn vertical_legend_uses_one_row_per_item() {
        let legend = LegendSpec::new(names(3)).with_orient(LegendOrient::Vertical);
        assert_eq!(legend.rows(100.0, &HeuristicTextMeasurer), 3);
    }
}

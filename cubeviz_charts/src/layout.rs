// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart bounds, grid margins, and text measurement for guide sizing.
//!
//! The compiler does not lay out pixels itself; it resolves the numbers a rendering engine
//! needs to place the plot rectangle:
//! - **Bounds**: container width, chart height, and outer margins.
//! - **Grid**: margins around the plot rectangle, widened on the right for a second value axis.

use kurbo::Rect;

/// Outer margins in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    /// Left margin.
    pub left: f64,
    /// Right margin.
    pub right: f64,
    /// Top margin.
    pub top: f64,
    /// Bottom margin.
    pub bottom: f64,
}

impl Margins {
    /// Creates margins from the four sides.
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(60.0, 40.0, 40.0, 60.0)
    }
}

/// Fully resolved chart bounds.
///
/// Produced by [`safe_bounds`](crate::safe_bounds); every field is finite.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Container width in pixels.
    pub width: f64,
    /// Chart height in pixels.
    pub chart_height: f64,
    /// Outer margins.
    pub margins: Margins,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 500.0,
            chart_height: 300.0,
            margins: Margins::default(),
        }
    }
}

impl Bounds {
    /// Returns the plot rectangle (bounds inset by margins), clamped to a non-negative size.
    pub fn plot_rect(&self) -> Rect {
        let m = self.margins;
        let x1 = (self.width - m.right).max(m.left);
        let y1 = (self.chart_height - m.bottom).max(m.top);
        Rect::new(m.left, m.top, x1, y1)
    }
}

/// Grid (plot area) placement for the rendering engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Left margin in pixels.
    pub left: f64,
    /// Right margin in pixels.
    pub right: f64,
    /// Top margin in pixels.
    pub top: f64,
    /// Bottom margin in pixels.
    pub bottom: f64,
    /// Whether axis labels are contained inside the grid margins.
    pub contain_label: bool,
}

impl Grid {
    /// A grid with the given margins.
    pub fn from_margins(margins: Margins) -> Self {
        Self {
            left: margins.left,
            right: margins.right,
            top: margins.top,
            bottom: margins.bottom,
            contain_label: true,
        }
    }

    /// A combo (dual-axis) grid: `extra_right` pixels are added to the right margin to fit the
    /// right axis tick labels.
    pub fn combo(margins: Margins, extra_right: f64) -> Self {
        let mut grid = Self::from_margins(margins);
        if extra_right.is_finite() {
            grid.right += extra_right.max(0.0);
        }
        grid
    }
}

/// A minimal text measurement interface used to size guides.
///
/// Callers can plug in a real text measurement backend, or use [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns `(width, height)` in pixels.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// A heuristic measurer assuming an average glyph width of 7px at a 12px font size.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = (7.0 / 12.0) * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}

/// Width needed on the right of the plot for the right value axis tick labels.
///
/// This is the widest label plus a fixed gap between the axis line and the labels.
pub fn right_axis_label_width(
    labels: &[&str],
    font_size: f64,
    measurer: &dyn TextMeasurer,
) -> f64 {
    const LABEL_GAP: f64 = 8.0;
    let widest = labels
        .iter()
        .map(|s| measurer.measure(s, font_size).0)
        .fold(0.0_f64, f64::max);
    if widest > 0.0 { widest + LABEL_GAP } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_grid_widens_only_the_right_margin() {
        let grid = Grid::combo(Margins::default(), 24.0);
        assert_eq!(grid.left, 60.0);
        assert_eq!(grid.right, 64.0);
        assert_eq!(grid.bottom, 60.0);

        let unchanged = Grid::combo(Margins::default(), f64::NAN);
        assert_eq!(unchanged.right, 40.0);
    }

    #[test]
    fn plot_rect_is_inset_by_margins() {
        let rect = Bounds::default().plot_rect();
        assert_eq!(rect, Rect::new(60.0, 40.0, 460.0, 240.0));

        let tiny = Bounds {
            width: 10.0,
            chart_height: 10.0,
            margins: Margins::default(),
        };
        assert!(tiny.plot_rect().width() >= 0.0);
        assert!(tiny.plot_rect().height() >= 0.0);
    }

    #[test]
    fn right_axis_width_tracks_widest_label() {
        let m = HeuristicTextMeasurer;
        let w = right_axis_label_width(&["1", "1,000"], 12.0, &m);
        assert!((w - (5.0 * 7.0 + 8.0)).abs() < 1e-9);
        assert_eq!(right_axis_label_width(&[], 12.0, &m), 0.0);
    }
}

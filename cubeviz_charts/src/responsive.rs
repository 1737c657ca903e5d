// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responsive layout resolution.
//!
//! A breakpoint table keyed by container width drives four independent lookups: margins, font
//! sizes, symbol size, and tick label rotation. Each lookup is a single deterministic pass with
//! no layout feedback.
//!
//! The default tables grow (never shrink) as the container widens.

use crate::layout::Margins;

/// A container width class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Breakpoint {
    /// Narrower than 480px.
    Mobile,
    /// Narrower than 768px.
    Tablet,
    /// Narrower than 1024px.
    Desktop,
    /// Narrower than 1280px.
    Large,
    /// 1280px and wider.
    XLarge,
}

impl Breakpoint {
    /// Every breakpoint, narrowest first.
    pub const ALL: [Self; 5] = [
        Self::Mobile,
        Self::Tablet,
        Self::Desktop,
        Self::Large,
        Self::XLarge,
    ];

    /// Classifies a container width. Non-finite widths count as desktop.
    pub fn from_width(width: f64) -> Self {
        if !width.is_finite() {
            return Self::Desktop;
        }
        if width < 480.0 {
            Self::Mobile
        } else if width < 768.0 {
            Self::Tablet
        } else if width < 1024.0 {
            Self::Desktop
        } else if width < 1280.0 {
            Self::Large
        } else {
            Self::XLarge
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Mobile => 0,
            Self::Tablet => 1,
            Self::Desktop => 2,
            Self::Large => 3,
            Self::XLarge => 4,
        }
    }
}

/// Font sizes in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSizes {
    /// Chart title.
    pub title: f64,
    /// Axis names.
    pub axis_name: f64,
    /// Axis tick labels.
    pub axis_label: f64,
    /// Legend entries.
    pub legend: f64,
    /// Tooltip text.
    pub tooltip: f64,
}

impl FontSizes {
    const fn new(title: f64, axis_name: f64, axis_label: f64, legend: f64, tooltip: f64) -> Self {
        Self {
            title,
            axis_name,
            axis_label,
            legend,
            tooltip,
        }
    }
}

/// Per-breakpoint tables, narrowest first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponsiveConfig {
    /// Margins per breakpoint.
    pub margins: [Margins; 5],
    /// Font sizes per breakpoint.
    pub font_sizes: [FontSizes; 5],
    /// Base symbol size per breakpoint, before density scaling.
    pub symbol_sizes: [f64; 5],
    /// Smallest symbol size density scaling may produce.
    pub min_symbol_size: f64,
    /// Estimated pixel width per label character, for rotation.
    pub char_width: f64,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            margins: [
                Margins::new(40.0, 16.0, 32.0, 48.0),
                Margins::new(50.0, 24.0, 36.0, 56.0),
                Margins::new(60.0, 32.0, 40.0, 60.0),
                Margins::new(64.0, 40.0, 44.0, 64.0),
                Margins::new(72.0, 48.0, 48.0, 72.0),
            ],
            font_sizes: [
                FontSizes::new(14.0, 11.0, 10.0, 10.0, 11.0),
                FontSizes::new(15.0, 12.0, 11.0, 11.0, 12.0),
                FontSizes::new(16.0, 12.0, 12.0, 12.0, 12.0),
                FontSizes::new(18.0, 13.0, 12.0, 12.0, 13.0),
                FontSizes::new(20.0, 14.0, 13.0, 13.0, 14.0),
            ],
            symbol_sizes: [4.0, 5.0, 6.0, 7.0, 8.0],
            min_symbol_size: 2.0,
            char_width: 7.0,
        }
    }
}

impl ResponsiveConfig {
    /// Margins for a container width.
    pub fn margins(&self, width: f64) -> Margins {
        self.margins[Breakpoint::from_width(width).index()]
    }

    /// Font sizes for a container width.
    pub fn font_sizes(&self, width: f64) -> FontSizes {
        self.font_sizes[Breakpoint::from_width(width).index()]
    }

    /// Symbol size for a container width and point count.
    ///
    /// Dense data shrinks symbols: above 500 points `x0.5`, above 200 `x0.7`, above 100 `x0.85`,
    /// never below `min_symbol_size`.
    pub fn symbol_size(&self, width: f64, point_count: usize) -> f64 {
        let base = self.symbol_sizes[Breakpoint::from_width(width).index()];
        let factor = if point_count > 500 {
            0.5
        } else if point_count > 200 {
            0.7
        } else if point_count > 100 {
            0.85
        } else {
            1.0
        };
        (base * factor).max(self.min_symbol_size)
    }

    /// Tick label rotation in degrees for `label_count` labels averaging `avg_label_length`
    /// characters across `width` pixels.
    ///
    /// The per-label budget `width / label_count` is compared to the estimated label width:
    /// at least `1.2x` gives `0`, `0.8x` gives `-30`, `0.5x` gives `-45`, anything less `-90`.
    pub fn label_rotation(&self, width: f64, label_count: usize, avg_label_length: f64) -> f64 {
        if label_count == 0 || !width.is_finite() || !avg_label_length.is_finite() {
            return 0.0;
        }
        let estimated = avg_label_length.max(0.0) * self.char_width;
        if estimated == 0.0 {
            return 0.0;
        }
        let ratio = (width / label_count as f64) / estimated;
        if ratio >= 1.2 {
            0.0
        } else if ratio >= 0.8 {
            -30.0
        } else if ratio >= 0.5 {
            -45.0
        } else {
            -90.0
        }
    }
}

/// Margins for a container width, from the default table.
pub fn responsive_margins(width: f64) -> Margins {
    ResponsiveConfig::default().margins(width)
}

/// Font sizes for a container width, from the default table.
pub fn responsive_font_sizes(width: f64) -> FontSizes {
    ResponsiveConfig::default().font_sizes(width)
}

/// Symbol size for a container width and point count, from the default table.
pub fn responsive_symbol_size(width: f64, point_count: usize) -> f64 {
    ResponsiveConfig::default().symbol_size(width, point_count)
}

/// Tick label rotation in degrees, with the default `7px` per character estimate.
pub fn calculate_axis_label_rotation(
    container_width: f64,
    label_count: usize,
    avg_label_length: f64,
) -> f64 {
    ResponsiveConfig::default().label_rotation(container_width, label_count, avg_label_length)
}

/// Average character count of `labels`; zero for none.
pub fn average_label_length<S: AsRef<str>>(labels: &[S]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let total: usize = labels.iter().map(|l| l.as_ref().chars().count()).sum();
    total as f64 / labels.len() as f64
}

/// Every responsive number a chart needs, resolved in one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponsiveLayout {
    /// The width class.
    pub breakpoint: Breakpoint,
    /// Outer margins.
    pub margins: Margins,
    /// Font sizes.
    pub font_sizes: FontSizes,
    /// Symbol size for scatter and line markers.
    pub symbol_size: f64,
    /// Category axis tick label rotation in degrees.
    pub label_rotation: f64,
}

impl ResponsiveLayout {
    /// Resolves every lookup for a container width, point count and category labels.
    pub fn resolve<S: AsRef<str>>(
        config: &ResponsiveConfig,
        width: f64,
        point_count: usize,
        labels: &[S],
    ) -> Self {
        let layout = Self {
            breakpoint: Breakpoint::from_width(width),
            margins: config.margins(width),
            font_sizes: config.font_sizes(width),
            symbol_size: config.symbol_size(width, point_count),
            label_rotation: config.label_rotation(
                width,
                labels.len(),
                average_label_length(labels),
            ),
        };
        log::trace!("responsive layout for width {width}: {layout:?}");
        layout
    }
}

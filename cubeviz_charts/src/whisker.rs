// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error-whisker projection.
//!
//! The rendering engine calls a custom render item once per whisker datum, handing it the datum
//! and its coordinate system. [`ErrorWhiskerRenderer`] is that render item: it projects the two
//! interval ends into device space and emits a stem with a perpendicular cap at each end.
//!
//! The projection itself is delegated to the engine's [`CoordinateSystem`], which knows which
//! axis carries values (vertical for column charts, horizontal for bar charts). The renderer
//! only decides which data slot holds the category and which way the caps point.

extern crate alloc;

use alloc::string::String;

use cubeviz_transforms::{ErrorWhiskerDatum, grouped_offset};
use kurbo::{BezPath, Point, Rect};

use crate::scale::{ScaleBand, ScaleLinear};

/// Paint order of whisker overlays, above bars and lines.
pub const WHISKER_Z: i32 = 10;

/// Maps a data-space `[x, y]` pair to a device-space point.
///
/// Category axes take (possibly fractional) category indices.
pub trait CoordinateSystem {
    /// Projects a data-space point.
    fn data_to_point(&self, value: [f64; 2]) -> Point;
}

impl<F: Fn([f64; 2]) -> Point> CoordinateSystem for F {
    fn data_to_point(&self, value: [f64; 2]) -> Point {
        self(value)
    }
}

/// Which way the value axis runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// Column charts: categories along x, values along y. Caps are horizontal.
    #[default]
    Vertical,
    /// Bar charts: values along x, categories along y. Caps are vertical.
    Horizontal,
}

impl Orientation {
    /// Orders `(category, value)` into the `[x, y]` pair the coordinate system expects.
    fn data_point(self, category: f64, value: f64) -> [f64; 2] {
        match self {
            Self::Vertical => [category, value],
            Self::Horizontal => [value, category],
        }
    }
}

/// A category band scale plus a linear value scale over a plot rectangle.
///
/// Rendering engines bring their own coordinate systems; this one serves callers that lay out
/// the plot themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianCoordinates {
    category: ScaleBand,
    value: ScaleLinear,
    orientation: Orientation,
}

impl CartesianCoordinates {
    /// Lays `category_count` bands and the `value_domain` over `plot`.
    ///
    /// Values grow upwards for vertical charts and rightwards for horizontal ones.
    pub fn new(
        plot: Rect,
        category_count: usize,
        value_domain: (f64, f64),
        orientation: Orientation,
    ) -> Self {
        let (category, value) = match orientation {
            Orientation::Vertical => (
                ScaleBand::new((plot.x0, plot.x1), category_count),
                ScaleLinear::new(value_domain, (plot.y1, plot.y0)),
            ),
            Orientation::Horizontal => (
                ScaleBand::new((plot.y0, plot.y1), category_count),
                ScaleLinear::new(value_domain, (plot.x0, plot.x1)),
            ),
        };
        Self {
            category,
            value,
            orientation,
        }
    }
}

impl CoordinateSystem for CartesianCoordinates {
    fn data_to_point(&self, [x, y]: [f64; 2]) -> Point {
        match self.orientation {
            Orientation::Vertical => Point::new(self.category.center(x), self.value.map(y)),
            Orientation::Horizontal => {
                Point::new(self.value.map(x), self.category.center(y))
            }
        }
    }
}

/// Stroke styling for whiskers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhiskerStyle {
    /// Stroke color.
    pub stroke: String,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

impl Default for WhiskerStyle {
    fn default() -> Self {
        Self {
            stroke: String::from("#333333"),
            stroke_width: 1.5,
        }
    }
}

/// A projected whisker: one stem and two caps.
#[derive(Clone, Debug, PartialEq)]
pub struct WhiskerShape {
    /// Three subpaths: stem, low cap, high cap.
    pub path: BezPath,
    /// Stroke color.
    pub stroke: String,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

/// The error-whisker custom render item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorWhiskerRenderer {
    /// Which way the value axis runs.
    pub orientation: Orientation,
    /// Half the cap length in pixels.
    pub cap_half_width: f64,
    /// Stroke styling.
    pub style: WhiskerStyle,
}

impl Default for ErrorWhiskerRenderer {
    fn default() -> Self {
        Self::new(Orientation::Vertical)
    }
}

impl ErrorWhiskerRenderer {
    /// Creates a renderer with a `5px` cap half-width and the default style.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            cap_half_width: 5.0,
            style: WhiskerStyle::default(),
        }
    }

    /// Sets the cap half-width.
    pub fn with_cap_half_width(mut self, cap_half_width: f64) -> Self {
        self.cap_half_width = cap_half_width;
        self
    }

    /// Sets the stroke styling.
    pub fn with_style(mut self, style: WhiskerStyle) -> Self {
        self.style = style;
        self
    }

    /// Renders one datum in array form: `[position, low, high]` or
    /// `[position, low, high, segment]`.
    ///
    /// `position` is used as-is, so grouped rows must already carry their offset (as rows from
    /// `build_grouped_error_whisker_data` do). Returns `None` when the first three entries are
    /// missing or non-finite.
    pub fn render(&self, datum: &[f64], coords: &dyn CoordinateSystem) -> Option<WhiskerShape> {
        let [position, low, high, ..] = *datum else {
            log::trace!("whisker datum has {} entries, skipping", datum.len());
            return None;
        };
        if !(position.is_finite() && low.is_finite() && high.is_finite()) {
            log::trace!("whisker datum {datum:?} is not finite, skipping");
            return None;
        }
        Some(self.project(position, low, high, coords))
    }

    /// Renders a typed whisker row.
    pub fn render_datum(
        &self,
        datum: &ErrorWhiskerDatum,
        coords: &dyn CoordinateSystem,
    ) -> Option<WhiskerShape> {
        self.render(&[datum.position, datum.low, datum.high], coords)
    }

    /// Renders the whisker of segment `segment` (of `segment_count`) at category `category`,
    /// shifted so it is centered under its bar in a grouped family.
    pub fn render_grouped(
        &self,
        category: usize,
        segment: usize,
        segment_count: usize,
        low: f64,
        high: f64,
        coords: &dyn CoordinateSystem,
    ) -> Option<WhiskerShape> {
        let position = category as f64 + grouped_offset(segment, segment_count);
        self.render(&[position, low, high], coords)
    }

    fn project(
        &self,
        position: f64,
        low: f64,
        high: f64,
        coords: &dyn CoordinateSystem,
    ) -> WhiskerShape {
        let p_low = coords.data_to_point(self.orientation.data_point(position, low));
        let p_high = coords.data_to_point(self.orientation.data_point(position, high));
        let c = self.cap_half_width;

        let mut path = BezPath::new();
        path.move_to(p_low);
        path.line_to(p_high);
        for p in [p_low, p_high] {
            let (a, b) = match self.orientation {
                Orientation::Vertical => ((p.x - c, p.y), (p.x + c, p.y)),
                Orientation::Horizontal => ((p.x, p.y - c), (p.x, p.y + c)),
            };
            path.move_to(a);
            path.line_to(b);
        }

        WhiskerShape {
            path,
            stroke: self.style.stroke.clone(),
            stroke_width: self.style.stroke_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::PathEl;

    use super::*;

    fn identity([x, y]: [f64; 2]) -> Point {
        Point::new(x, y)
    }

    fn elements(shape: &WhiskerShape) -> alloc::vec::Vec<PathEl> {
        shape.path.elements().to_vec()
    }

    #[test]
    fn vertical_whisker_has_stem_and_horizontal_caps() {
        let r = ErrorWhiskerRenderer::new(Orientation::Vertical);
        let shape = r.render(&[2.0, 5.0, 15.0], &identity).unwrap();
        assert_eq!(
            elements(&shape),
            [
                PathEl::MoveTo(Point::new(2.0, 5.0)),
                PathEl::LineTo(Point::new(2.0, 15.0)),
                PathEl::MoveTo(Point::new(-3.0, 5.0)),
                PathEl::LineTo(Point::new(7.0, 5.0)),
                PathEl::MoveTo(Point::new(-3.0, 15.0)),
                PathEl::LineTo(Point::new(7.0, 15.0)),
            ]
        );
    }

    #[test]
    fn horizontal_whisker_swaps_axes() {
        let r = ErrorWhiskerRenderer::new(Orientation::Horizontal).with_cap_half_width(2.0);
        let shape = r.render(&[1.0, 10.0, 20.0], &identity).unwrap();
        let els = elements(&shape);
        assert_eq!(els[0], PathEl::MoveTo(Point::new(10.0, 1.0)));
        assert_eq!(els[1], PathEl::LineTo(Point::new(20.0, 1.0)));
        assert_eq!(els[2], PathEl::MoveTo(Point::new(10.0, -1.0)));
        assert_eq!(els[3], PathEl::LineTo(Point::new(10.0, 3.0)));
    }

    #[test]
    fn malformed_datum_renders_nothing() {
        let r = ErrorWhiskerRenderer::default();
        assert!(r.render(&[1.0, 2.0], &identity).is_none());
        assert!(r.render(&[1.0, f64::NAN, 2.0], &identity).is_none());
        assert!(r.render(&[1.0, 2.0, 3.0, 0.0], &identity).is_some());
    }

    #[test]
    fn grouped_whisker_is_shifted_by_its_offset() {
        let r = ErrorWhiskerRenderer::default();
        let shape = r.render_grouped(1, 0, 3, 0.0, 1.0, &identity).unwrap();
        let PathEl::MoveTo(start) = elements(&shape)[0] else {
            panic!("stem must start with a move");
        };
        assert!((start.x - (1.0 - 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn cartesian_coordinates_center_categories_and_flip_values() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let coords =
            CartesianCoordinates::new(plot, 2, (0.0, 10.0), Orientation::Vertical);
        let p = coords.data_to_point([0.0, 10.0]);
        assert_eq!(p.y, 0.0);
        assert!(p.x > 0.0 && p.x < 50.0);
        assert_eq!(coords.data_to_point([1.0, 0.0]).y, 50.0);

        let horizontal =
            CartesianCoordinates::new(plot, 2, (0.0, 10.0), Orientation::Horizontal);
        assert_eq!(horizontal.data_to_point([10.0, 0.0]).x, 100.0);
    }
}

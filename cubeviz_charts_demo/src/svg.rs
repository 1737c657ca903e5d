// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG preview for compiled bar charts with error whiskers.

use std::fmt::Write as _;

use cubeviz_charts::WhiskerShape;
use kurbo::Rect;

#[derive(Debug)]
enum Item {
    Bar { rect: Rect, fill: String },
    Whisker(WhiskerShape),
}

#[derive(Debug)]
pub(crate) struct SvgScene {
    items: Vec<(i32, Item)>,
    view_box: Rect,
}

impl SvgScene {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            items: Vec::new(),
            view_box: Rect::new(0.0, 0.0, width, height),
        }
    }

    pub(crate) fn push_bar(&mut self, z: i32, rect: Rect, fill: &str) {
        self.items.push((
            z,
            Item::Bar {
                rect: rect.abs(),
                fill: fill.to_owned(),
            },
        ));
    }

    pub(crate) fn push_whisker(&mut self, z: i32, shape: WhiskerShape) {
        self.items.push((z, Item::Whisker(shape)));
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let v = self.view_box;
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        let _ = writeln!(
            out,
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            v.x0,
            v.y0,
            v.width(),
            v.height(),
            v.width(),
            v.height()
        );

        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|i| self.items[*i].0);
        for i in order {
            match &self.items[i].1 {
                Item::Bar { rect, fill } => {
                    let _ = writeln!(
                        out,
                        r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{fill}"/>"#,
                        rect.x0,
                        rect.y0,
                        rect.width(),
                        rect.height()
                    );
                }
                Item::Whisker(shape) => {
                    let _ = writeln!(
                        out,
                        r#"  <path d="{}" stroke="{}" stroke-width="{}" fill="none"/>"#,
                        shape.path.to_svg(),
                        shape.stroke,
                        shape.stroke_width
                    );
                }
            }
        }
        out.push_str("</svg>\n");
        out
    }
}

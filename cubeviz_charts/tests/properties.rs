// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for domain safety, responsive sizing, tooltip escaping, and series families.

use cubeviz_charts::{
    BarOptions, DomainProvider, LineOptions, TooltipOptions, bar_series_group, category_tooltip,
    format_number, line_series_group, responsive_font_sizes, responsive_margins,
    responsive_symbol_size, safe_domain, stacked_area_series_group, stacked_bar_series_group,
};
use cubeviz_transforms::SegmentValues;
use proptest::prelude::*;
use serde_json::json;

fn any_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e9_f64..1e9,
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

fn segments_strategy() -> impl Strategy<Value = Vec<SegmentValues>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::of(-1e3_f64..1e3), 3),
        0..6,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, values)| SegmentValues::new(format!("S{i}"), values))
            .collect()
    })
}

fn gray(_: &str) -> String {
    String::from("#888888")
}

proptest! {
    #[test]
    fn safe_domain_is_always_finite(
        domain in prop::collection::vec(any_f64(), 0..4),
        lo in -1e6_f64..1e6,
        hi in -1e6_f64..1e6,
    ) {
        let (d0, d1) = safe_domain(Some(&domain as &dyn DomainProvider), (lo, hi));
        prop_assert!(d0.is_finite() && d1.is_finite());
        if domain.len() != 2 {
            prop_assert_eq!((d0, d1), (lo, hi));
        } else {
            prop_assert_eq!(d0, if domain[0].is_finite() { domain[0] } else { lo });
            prop_assert_eq!(d1, if domain[1].is_finite() { domain[1] } else { hi });
        }
        prop_assert_eq!(safe_domain(None, (lo, hi)), (lo, hi));
    }

    #[test]
    fn responsive_sizes_do_not_shrink_with_width(a in 0.0_f64..3000.0, b in 0.0_f64..3000.0, points in 0_usize..2000) {
        let (narrow, wide) = if a <= b { (a, b) } else { (b, a) };
        let (m0, m1) = (responsive_margins(narrow), responsive_margins(wide));
        prop_assert!(m0.left <= m1.left && m0.right <= m1.right);
        prop_assert!(m0.top <= m1.top && m0.bottom <= m1.bottom);

        let (f0, f1) = (responsive_font_sizes(narrow), responsive_font_sizes(wide));
        prop_assert!(f0.title <= f1.title && f0.axis_label <= f1.axis_label);
        prop_assert!(f0.legend <= f1.legend && f0.tooltip <= f1.tooltip);

        prop_assert!(responsive_symbol_size(narrow, points) <= responsive_symbol_size(wide, points));
    }

    #[test]
    fn tooltip_never_emits_raw_markup(name in "[a-z<>&\"' ]{0,16}", value in -1e6_f64..1e6) {
        let series_name = format!("<script>{name}</script>");
        let formatter = category_tooltip(TooltipOptions::default());
        let html = formatter(&json!({
            "seriesName": series_name,
            "name": name,
            "marker": "",
            "value": value,
        }));
        prop_assert!(!html.contains("<script>"));
        prop_assert!(html.contains("&lt;script&gt;"));
        prop_assert!(html.contains(&format_number(value, 2)));
    }

    #[test]
    fn stacked_families_share_one_key(segments in segments_strategy(), key in prop::option::of("[a-z]{1,6}")) {
        let bars = stacked_bar_series_group(&segments, &gray, &BarOptions::default(), key.as_deref(), true);
        let areas = stacked_area_series_group(&segments, &gray, &LineOptions::default(), key.as_deref(), true);
        let expected = key.as_deref().unwrap_or("total");
        prop_assert_eq!(bars.len(), segments.len());
        prop_assert!(bars.iter().chain(&areas).all(|s| s.stack.as_deref() == Some(expected)));

        let grouped = bar_series_group(&segments, &gray, &BarOptions::default(), true);
        let lines = line_series_group(&segments, &gray, &LineOptions::default(), true);
        prop_assert!(grouped.iter().chain(&lines).all(|s| s.stack.is_none()));
        for (s, row) in grouped.iter().zip(&segments) {
            prop_assert_eq!(s.data.len(), row.values.len());
        }
    }
}

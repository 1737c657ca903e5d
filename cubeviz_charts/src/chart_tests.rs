// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use cubeviz_core::{
    Observation, Timestamp, flag_column, number_column, range_columns, text_column, time_column,
};
use serde_json::json;

use crate::{
    AxisType, BarLayout, CategoryChartSpec, ChartOptions, ComboChartSpec,
    Orientation, PartialBounds, PieChartSpec, ScatterChartSpec, SeriesDatum, SeriesType,
    TimeSeriesChartSpec, TimeSeriesKind, TooltipTrigger, calculate_axis_label_rotation,
    safe_bounds,
};

fn grouped_observations() -> Vec<Observation> {
    vec![
        Observation::new().with("cat", "A").with("seg", "S1").with("v", 10.0),
        Observation::new().with("cat", "A").with("seg", "S2").with("v", 15.0),
        Observation::new().with("cat", "B").with("seg", "S1").with("v", 20.0),
        Observation::new().with("cat", "B").with("seg", "S2").with("v", 25.0),
    ]
}

fn segmented_chart() -> CategoryChartSpec {
    CategoryChartSpec::new(text_column("cat"), number_column("v"))
        .with_segment(text_column("seg"))
        .with_categories(vec!["A".into(), "B".into()])
        .with_segments(vec!["S1".into(), "S2".into()])
}

fn values(data: &[SeriesDatum]) -> Vec<Option<f64>> {
    data.iter().map(SeriesDatum::value).collect()
}

#[test]
fn grouped_and_stacked_bars_differ_only_in_stack_key() {
    let data = grouped_observations();

    let grouped = segmented_chart().compile(&data, None);
    assert_eq!(grouped.series.len(), 2);
    assert_eq!(grouped.series[0].name, "S1");
    assert_eq!(grouped.series[1].name, "S2");
    assert_eq!(values(&grouped.series[0].data), [Some(10.0), Some(20.0)]);
    assert_eq!(values(&grouped.series[1].data), [Some(15.0), Some(25.0)]);
    assert!(grouped.series.iter().all(|s| s.stack.is_none()));
    assert!(grouped.legend.show);
    assert_eq!(grouped.legend.data, ["S1", "S2"]);

    let stacked = segmented_chart()
        .with_layout(BarLayout::Stacked(None))
        .compile(&data, None);
    assert_eq!(stacked.series.len(), 2);
    assert!(
        stacked
            .series
            .iter()
            .all(|s| s.stack.as_deref() == Some("total"))
    );
    assert_eq!(values(&stacked.series[1].data), [Some(15.0), Some(25.0)]);

    // Stacked totals reach 45 for "B".
    let grouped_max = grouped.y_axis[0].max.unwrap_or_default();
    let stacked_max = stacked.y_axis[0].max.unwrap_or_default();
    assert!(grouped_max >= 25.0);
    assert!(stacked_max >= 45.0);
    assert_eq!(stacked.y_axis[0].min, Some(0.0));
}

#[test]
fn category_chart_without_segments_is_a_single_series() {
    let data = grouped_observations();
    let spec = CategoryChartSpec::new(text_column("cat"), number_column("v"))
        .with_value_name("Sales")
        .compile(&data, None);
    assert_eq!(spec.series.len(), 1);
    assert_eq!(spec.series[0].name, "Sales");
    assert_eq!(spec.series[0].series_type, SeriesType::Bar);
    // First observation per category wins.
    assert_eq!(values(&spec.series[0].data), [Some(10.0), Some(20.0)]);
    assert!(!spec.legend.show);
    assert_eq!(spec.x_axis[0].axis_type, AxisType::Category);
    assert_eq!(spec.x_axis[0].data, ["A", "B"]);
    assert_eq!(spec.tooltip.trigger, TooltipTrigger::Axis);
    assert!(spec.validate().is_valid());
}

#[test]
fn color_by_category_styles_each_bar() {
    let data = grouped_observations();
    let spec = CategoryChartSpec::new(text_column("cat"), number_column("v"))
        .with_color_by_category(true)
        .compile(&data, None);
    let colors: Vec<&str> = spec.series[0]
        .data
        .iter()
        .filter_map(|d| match d {
            SeriesDatum::Styled { color, .. } => Some(color.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(colors.len(), 2);
    assert_ne!(colors[0], colors[1]);
    assert!(spec.series[0].color.is_none());
}

#[test]
fn horizontal_bars_swap_axes() {
    let data = grouped_observations();
    let spec = CategoryChartSpec::new(text_column("cat"), number_column("v"))
        .with_orientation(Orientation::Horizontal)
        .compile(&data, None);
    assert_eq!(spec.x_axis[0].axis_type, AxisType::Value);
    assert_eq!(spec.y_axis[0].axis_type, AxisType::Category);
    assert_eq!(spec.y_axis[0].label_rotation, 0.0);
}

#[test]
fn error_whiskers_skip_categories_without_intervals() {
    let data = vec![
        Observation::new()
            .with("cat", "A")
            .with("v", 10.0)
            .with("err", 1.0)
            .with("lo", 5.0)
            .with("hi", 15.0),
        Observation::new().with("cat", "B").with("v", 12.0),
        Observation::new()
            .with("cat", "C")
            .with("v", 15.0)
            .with("err", 1.0)
            .with("lo", 10.0)
            .with("hi", 20.0),
    ];
    let spec = CategoryChartSpec::new(text_column("cat"), number_column("v"))
        .with_categories(vec!["A".into(), "B".into(), "C".into()])
        .with_error_whiskers(flag_column("err"), range_columns("lo", "hi"))
        .compile(&data, None);

    assert_eq!(spec.series.len(), 2);
    let whiskers = &spec.series[1];
    assert_eq!(whiskers.series_type, SeriesType::Custom);
    assert!(whiskers.render_item.is_some());
    assert!(whiskers.z > spec.series[0].z);
    let rows: Vec<Vec<f64>> = whiskers
        .data
        .iter()
        .filter_map(|d| match d {
            SeriesDatum::Whisker(w) => Some(w.to_vec()),
            _ => None,
        })
        .collect();
    assert_eq!(rows, [vec![0.0, 5.0, 15.0], vec![2.0, 10.0, 20.0]]);
    assert!(spec.y_axis[0].max.unwrap_or_default() >= 20.0);
    // The overlay is not a legend entry.
    assert!(!spec.legend.show);
}

#[test]
fn time_series_segments_align_on_the_global_axis() {
    let data = vec![
        Observation::new()
            .with("t", Timestamp(1000))
            .with("seg", "A")
            .with("v", 10.0),
        Observation::new()
            .with("t", Timestamp(2000))
            .with("seg", "A")
            .with("v", 20.0),
        Observation::new()
            .with("t", Timestamp(3000))
            .with("seg", "B")
            .with("v", 5.0),
    ];
    let spec = TimeSeriesChartSpec::new(time_column("t"), number_column("v"))
        .with_segment(text_column("seg"))
        .compile(&data, None);

    assert_eq!(spec.x_axis[0].data.len(), 3);
    assert!(!spec.x_axis[0].boundary_gap);
    assert_eq!(spec.series.len(), 2);
    assert_eq!(spec.series[0].name, "A");
    assert_eq!(values(&spec.series[0].data), [Some(10.0), Some(20.0), None]);
    assert_eq!(values(&spec.series[1].data), [None, None, Some(5.0)]);
    assert!(spec.series[0].symbol_size.is_some());
}

#[test]
fn stacked_area_series_share_a_key() {
    let data = vec![
        Observation::new()
            .with("t", Timestamp(0))
            .with("seg", "A")
            .with("v", 1.0),
        Observation::new()
            .with("t", Timestamp(0))
            .with("seg", "B")
            .with("v", 2.0),
    ];
    let spec = TimeSeriesChartSpec::new(time_column("t"), number_column("v"))
        .with_segment(text_column("seg"))
        .with_kind(TimeSeriesKind::StackedArea(Some("flows".into())))
        .compile(&data, None);
    assert!(
        spec.series
            .iter()
            .all(|s| s.stack.as_deref() == Some("flows") && s.area_opacity.is_some())
    );
    assert!(spec.y_axis[0].max.unwrap_or_default() >= 3.0);
}

#[test]
fn combo_chart_puts_the_line_on_the_right_axis() {
    let data = vec![
        Observation::new()
            .with("cat", "A")
            .with("rev", 1200.0)
            .with("rate", 0.25),
        Observation::new()
            .with("cat", "B")
            .with("rev", 900.0)
            .with("rate", 0.5),
    ];
    let spec = ComboChartSpec::new(text_column("cat"), number_column("rev"), number_column("rate"))
        .with_bar_name("Revenue")
        .with_line_name("Rate")
        .compile(&data, None);

    assert_eq!(spec.y_axis.len(), 2);
    assert!(spec.y_axis[0].split_line);
    assert!(!spec.y_axis[1].split_line);
    assert_eq!(spec.series[0].series_type, SeriesType::Bar);
    assert_eq!(spec.series[0].y_axis_index, 0);
    assert_eq!(spec.series[1].series_type, SeriesType::Line);
    assert_eq!(spec.series[1].y_axis_index, 1);
    assert!(spec.grid.right > spec.layout.margins.right);

    let html = spec.format_tooltip(&json!([
        { "seriesName": "Revenue", "name": "A", "marker": "", "value": 1200 },
        { "seriesName": "Rate", "name": "A", "marker": "", "value": 0.25 },
    ]));
    assert_eq!(html, "A<br/>Revenue: <b>1,200</b><br/>Rate: <b>0.25</b>");
}

#[test]
fn combo_chart_keeps_sides_apart_when_names_match() {
    let data = vec![
        Observation::new()
            .with("cat", "A")
            .with("rev", 1200.0)
            .with("rate", 0.25),
    ];
    let spec = ComboChartSpec::new(text_column("cat"), number_column("rev"), number_column("rate"))
        .with_bar_name("Q1")
        .with_line_name("Q1")
        .with_tooltip_options(
            crate::TooltipOptions::default().with_unit(" $"),
            crate::TooltipOptions::default().with_unit("%"),
        )
        .compile(&data, None);

    assert_ne!(spec.series[0].color, spec.series[1].color);
    let html = spec.format_tooltip(&json!([
        { "seriesName": "Q1", "seriesIndex": 0, "name": "A", "marker": "", "value": 1200 },
        { "seriesName": "Q1", "seriesIndex": 1, "name": "A", "marker": "", "value": 0.25 },
    ]));
    assert_eq!(html, "A<br/>Q1: <b>1,200 $</b><br/>Q1: <b>0.25%</b>");
}

#[test]
fn scatter_chart_groups_points_and_sizes_symbols() {
    let data = vec![
        Observation::new().with("x", 1.0).with("y", 2.0).with("g", "a"),
        Observation::new().with("x", 3.0).with("y", 4.0).with("g", "b"),
        Observation::new().with("x", 5.0).with("g", "a"),
    ];
    let chart = ScatterChartSpec::new(number_column("x"), number_column("y"))
        .with_segment(text_column("g"));
    let groups = chart.points(&data);
    assert_eq!(groups[0], ("a".into(), vec![(1.0, 2.0)]));
    assert_eq!(groups[1], ("b".into(), vec![(3.0, 4.0)]));

    let spec = chart.compile(&data, None);
    assert_eq!(spec.tooltip.trigger, TooltipTrigger::Item);
    assert_eq!(spec.series[0].symbol_size, Some(spec.layout.symbol_size));
    assert_eq!(spec.x_axis[0].axis_type, AxisType::Value);

    let fixed = chart.with_symbol_size(12.0).compile(&data, None);
    assert_eq!(fixed.series[1].symbol_size, Some(12.0));
}

#[test]
fn pie_chart_drops_missing_and_negative_slices() {
    let data = vec![
        Observation::new().with("k", "a").with("v", 3.0),
        Observation::new().with("k", "b").with("v", -1.0),
        Observation::new().with("k", "c"),
        Observation::new().with("k", "d").with("v", 1.0),
    ];
    let spec = PieChartSpec::new(text_column("k"), number_column("v")).compile(&data, None);
    assert!(spec.x_axis.is_empty());
    let names: Vec<&str> = spec.series[0]
        .data
        .iter()
        .filter_map(|d| match d {
            SeriesDatum::Named { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["a", "d"]);
    assert_eq!(spec.legend.data, ["a", "d"]);
    assert_eq!(spec.tooltip.trigger, TooltipTrigger::Item);
}

#[test]
fn missing_bounds_use_defaults_and_width_drives_layout() {
    let bounds = safe_bounds(None);
    assert_eq!(bounds.width, 500.0);
    assert_eq!(bounds.chart_height, 300.0);
    assert_eq!(bounds.margins.left, 60.0);
    assert_eq!(bounds.margins.right, 40.0);
    assert_eq!(bounds.margins.top, 40.0);
    assert_eq!(bounds.margins.bottom, 60.0);

    let data = grouped_observations();
    let narrow = segmented_chart().compile(&data, Some(&PartialBounds::with_width(320.0)));
    let wide = segmented_chart().compile(&data, Some(&PartialBounds::with_width(1600.0)));
    assert_eq!(narrow.width, 320.0);
    assert_eq!(narrow.height, 300.0);
    assert!(narrow.grid.left <= wide.grid.left);
    assert!(narrow.layout.font_sizes.axis_label <= wide.layout.font_sizes.axis_label);

    let fixed = segmented_chart()
        .with_options(ChartOptions::default().with_responsive(false))
        .compile(&data, None);
    assert_eq!(fixed.grid.left, 60.0);
}

#[test]
fn cramped_labels_rotate_fully() {
    assert_eq!(calculate_axis_label_rotation(100.0, 50, 20.0), -90.0);
}

#[test]
fn tooltip_escapes_series_names() {
    let spec = segmented_chart().compile(&grouped_observations(), None);
    let html = spec.format_tooltip(&json!({
        "seriesName": "<script>alert(1)</script>",
        "name": "A",
        "marker": "",
        "value": 10,
    }));
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn custom_colors_and_titles_flow_through() {
    let options = ChartOptions::default()
        .with_title("Quarterly")
        .with_animation(false)
        .with_colors(Arc::new(|_: &str| String::from("#000000")));
    let spec = segmented_chart()
        .with_options(options)
        .compile(&grouped_observations(), None);
    assert_eq!(spec.title.as_deref(), Some("Quarterly"));
    assert!(!spec.animation);
    assert!(
        spec.series
            .iter()
            .all(|s| s.color.as_deref() == Some("#000000") && !s.animation)
    );
}

#[test]
fn empty_data_compiles_to_an_empty_chart() {
    let spec = segmented_chart().compile(&[], None);
    assert_eq!(spec.series.len(), 2);
    assert!(spec.series.iter().all(|s| s.data.iter().all(SeriesDatum::is_null)));
    assert_eq!(spec.y_axis[0].min, Some(0.0));
    assert_eq!(spec.y_axis[0].max, Some(1.0));
}

// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart compiler demos for `cubeviz_charts`.
//!
//! Compiles one chart of each kind from sample observations and writes the specifications, a
//! sample tooltip per chart, and validation findings to `cubeviz_charts_demo.json`. The bar
//! chart with error whiskers is also previewed as `cubeviz_whiskers.svg`.

mod svg;

use cubeviz_charts::{
    BarLayout, CartesianCoordinates, CategoryChartSpec, ChartOptions, ChartSpecification,
    ComboChartSpec, CoordinateSystem, Orientation, PartialBounds, PieChartSpec, ScatterChartSpec,
    SeriesDatum, TimeSeriesChartSpec, TimeSeriesKind, TooltipOptions, validate_observations,
};
use cubeviz_core::{
    Observation, Timestamp, flag_column, number_column, range_columns, text_column, time_column,
};
use kurbo::Rect;
use serde_json::{Value as Json, json};

const DAY_MS: i64 = 86_400_000;

fn sales() -> Vec<Observation> {
    let rows = [
        ("North", "Online", 120.0, 8.0),
        ("North", "Retail", 95.0, 0.0),
        ("South", "Online", 80.0, 12.0),
        ("South", "Retail", 130.0, 6.0),
        ("East", "Online", 60.0, 0.0),
        ("East", "Retail", 70.0, 9.0),
    ];
    rows.iter()
        .map(|&(region, channel, value, err)| {
            let d = Observation::new()
                .with("region", region)
                .with("channel", channel)
                .with("sales", value);
            if err > 0.0 {
                d.with("has_ci", 1.0)
                    .with("lo", value - err)
                    .with("hi", value + err)
            } else {
                d
            }
        })
        .collect()
}

fn traffic() -> Vec<Observation> {
    let start = 1_735_689_600_000; // 2025-01-01
    (0..14)
        .flat_map(|day| {
            let t = Timestamp(start + day * DAY_MS);
            let web = 100.0 + (day as f64) * 3.0;
            let app = 60.0 + (day as f64 * 0.7).sin() * 10.0;
            let mut out = vec![
                Observation::new()
                    .with("day", t)
                    .with("source", "Web")
                    .with("visits", web),
            ];
            // The app reports every other day.
            if day % 2 == 0 {
                out.push(
                    Observation::new()
                        .with("day", t)
                        .with("source", "App")
                        .with("visits", app),
                );
            }
            out
        })
        .collect()
}

fn region_totals() -> Vec<Observation> {
    [("North", 215.0, 0.42), ("South", 210.0, 0.35), ("East", 130.0, 0.51)]
        .iter()
        .map(|&(region, revenue, margin)| {
            Observation::new()
                .with("region", region)
                .with("revenue", revenue)
                .with("margin", margin)
        })
        .collect()
}

fn measurements() -> Vec<Observation> {
    (0..40)
        .map(|i| {
            let x = i as f64 * 0.25;
            Observation::new()
                .with("height", 150.0 + x * 4.0)
                .with("weight", 50.0 + x * 2.5 + (i % 7) as f64)
                .with("group", if i % 3 == 0 { "A" } else { "B" })
        })
        .collect()
}

fn section(title: &str, spec: &ChartSpecification, tooltip_payload: Json) -> Json {
    let report = spec.validate();
    for issue in &report.errors {
        log::warn!("{title}: {issue}");
    }
    json!({
        "title": title,
        "tooltip_preview": spec.format_tooltip(&tooltip_payload),
        "errors": report.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "warnings": report.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "spec": spec,
    })
}

fn grouped_bars_demo(bounds: &PartialBounds) -> (Json, ChartSpecification) {
    let data = sales();
    let missing = validate_observations(&data, &["region", "channel", "sales"]);
    log::info!("sales data valid: {}", missing.is_valid());

    let spec = CategoryChartSpec::new(text_column("region"), number_column("sales"))
        .with_segment(text_column("channel"))
        .with_error_whiskers(flag_column("has_ci"), range_columns("lo", "hi"))
        .with_value_name("Sales")
        .with_category_name("Region")
        .with_tooltip_options(TooltipOptions::default().with_unit(" k$").with_decimals(1))
        .with_options(ChartOptions::default().with_title("Sales by region"))
        .compile(&data, Some(bounds));
    let payload = json!([
        { "seriesName": "Online", "name": "North", "marker": "", "value": 120 },
        { "seriesName": "Retail", "name": "North", "marker": "", "value": 95 },
    ]);
    (section("Grouped bars with error whiskers", &spec, payload), spec)
}

fn stacked_bars_demo(bounds: &PartialBounds) -> Json {
    let spec = CategoryChartSpec::new(text_column("region"), number_column("sales"))
        .with_segment(text_column("channel"))
        .with_layout(BarLayout::Stacked(None))
        .with_value_name("Sales")
        .compile(&sales(), Some(bounds));
    let payload = json!([{ "seriesName": "Online", "name": "South", "marker": "", "value": 80 }]);
    section("Stacked bars", &spec, payload)
}

fn time_series_demo(bounds: &PartialBounds) -> Json {
    let spec = TimeSeriesChartSpec::new(time_column("day"), number_column("visits"))
        .with_segment(text_column("source"))
        .with_kind(TimeSeriesKind::StackedArea(None))
        .with_value_name("Visits")
        .with_tooltip_options(TooltipOptions::default().with_decimals(0))
        .compile(&traffic(), Some(bounds));
    let payload = json!([
        { "seriesName": "Web", "marker": "", "value": [1_735_689_600_000_i64, 100] },
        { "seriesName": "App", "marker": "", "value": [1_735_689_600_000_i64, 60] },
    ]);
    section("Stacked areas over time", &spec, payload)
}

fn combo_demo(bounds: &PartialBounds) -> Json {
    let spec = ComboChartSpec::new(
        text_column("region"),
        number_column("revenue"),
        number_column("margin"),
    )
    .with_bar_name("Revenue")
    .with_line_name("Margin")
    .with_tooltip_options(
        TooltipOptions::default().with_unit(" k$"),
        TooltipOptions::default().with_decimals(3),
    )
    .compile(&region_totals(), Some(bounds));
    let payload = json!([
        { "seriesName": "Revenue", "name": "East", "marker": "", "value": 130 },
        { "seriesName": "Margin", "name": "East", "marker": "", "value": 0.51 },
    ]);
    section("Revenue and margin", &spec, payload)
}

fn scatter_demo(bounds: &PartialBounds) -> Json {
    let spec = ScatterChartSpec::new(number_column("height"), number_column("weight"))
        .with_segment(text_column("group"))
        .with_axis_names("Height", "Weight")
        .compile(&measurements(), Some(bounds));
    let payload = json!({
        "componentSubType": "scatter",
        "seriesName": "A",
        "marker": "",
        "value": [160, 62.5],
    });
    section("Height vs weight", &spec, payload)
}

fn pie_demo(bounds: &PartialBounds) -> Json {
    let spec = PieChartSpec::new(text_column("region"), number_column("revenue"))
        .with_name("Revenue")
        .with_inner_radius(0.4)
        .compile(&region_totals(), Some(bounds));
    let payload = json!({
        "componentSubType": "pie",
        "name": "North",
        "marker": "",
        "value": 215,
        "percent": 38.7,
    });
    section("Revenue share", &spec, payload)
}

/// Draws the bars and whiskers of a single-axis category chart with the library's own
/// coordinate system.
fn whisker_preview(spec: &ChartSpecification) -> String {
    let plot = Rect::new(
        spec.grid.left,
        spec.grid.top,
        spec.width - spec.grid.right,
        spec.height - spec.grid.bottom,
    );
    let (Some(categories), Some(value_axis)) = (spec.x_axis.first(), spec.y_axis.first()) else {
        return String::new();
    };
    let domain = (
        value_axis.min.unwrap_or(0.0),
        value_axis.max.unwrap_or(1.0),
    );
    let bar_series: Vec<_> = spec.series.iter().filter(|s| s.render_item.is_none()).collect();
    let coords =
        CartesianCoordinates::new(plot, categories.data.len(), domain, Orientation::Vertical);

    let mut scene = svg::SvgScene::new(spec.width, spec.height);
    let n = bar_series.len().max(1) as f64;
    let half = 0.45 / n;
    for (s, series) in bar_series.iter().enumerate() {
        let fill = series.color.as_deref().unwrap_or("#999999");
        let offset = (s as f64 - (n - 1.0) / 2.0) / n;
        for (i, datum) in series.data.iter().enumerate() {
            let Some(v) = datum.value() else {
                continue;
            };
            let center = i as f64 + offset;
            let a = coords.data_to_point([center - half, domain.0.max(0.0)]);
            let b = coords.data_to_point([center + half, v]);
            scene.push_bar(series.z, Rect::from_points(a, b), fill);
        }
    }
    for series in spec.series.iter().filter(|s| s.render_item.is_some()) {
        let Some(renderer) = &series.render_item else {
            continue;
        };
        for datum in &series.data {
            if let SeriesDatum::Whisker(w) = datum
                && let Some(shape) = renderer.render_datum(w, &coords)
            {
                scene.push_whisker(series.z, shape);
            }
        }
    }
    scene.to_svg_string()
}

fn main() {
    env_logger::init();

    let bounds = PartialBounds::with_width(720.0);
    let (bars, bar_spec) = grouped_bars_demo(&bounds);
    let sections = vec![
        bars,
        stacked_bars_demo(&bounds),
        time_series_demo(&bounds),
        combo_demo(&bounds),
        scatter_demo(&bounds),
        pie_demo(&bounds),
    ];

    let report = json!({ "title": "CubeViz charts demo", "sections": sections });
    let text = serde_json::to_string_pretty(&report).expect("serialize demo report");
    std::fs::write("cubeviz_charts_demo.json", text).expect("write cubeviz_charts_demo.json");
    println!("wrote cubeviz_charts_demo.json");

    std::fs::write("cubeviz_whiskers.svg", whisker_preview(&bar_spec))
        .expect("write cubeviz_whiskers.svg");
    println!("wrote cubeviz_whiskers.svg");
}

// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip formatter factories.
//!
//! Rendering engines hand tooltip callbacks an untyped payload: one parameter object, or an
//! array of them for axis-triggered tooltips. Formatters narrow that payload into
//! [`TooltipParam`]s at the boundary and produce an HTML fragment.
//!
//! Formatters never fail. Input that is not an object or array, or that has no valid
//! parameter, formats as an empty string. A valid parameter without a usable value is skipped
//! line by line. Every data-sourced string is escaped; engine-provided marker HTML is not.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use cubeviz_core::Timestamp;
use hashbrown::HashSet;
use serde_json::Value as Json;
use smallvec::SmallVec;

use crate::format::{escape_html, format_number};
use crate::time::{TimeGranularity, format_timestamp};

/// A tooltip formatter: untyped engine payload in, HTML fragment out.
pub type TooltipFormatter = Arc<dyn Fn(&Json) -> String + Send + Sync>;

/// Formats a tooltip value (without unit).
pub type ValueFormatter = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// A value in one of the shapes engines send, in detection order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TooltipValue {
    /// A bare number.
    Number(f64),
    /// A `[first, second]` pair: `[timestamp, value]` on time axes, `[x, y]` on scatter plots.
    ///
    /// The second element is `None` for `null`, which engines send for time series gaps.
    Pair(f64, Option<f64>),
    /// A `{ "value": number }` wrapper.
    Wrapped(f64),
}

impl TooltipValue {
    /// Detects the value shape: number, then pair, then wrapper.
    pub fn from_json(value: &Json) -> Option<Self> {
        if let Some(n) = value.as_f64() {
            return Some(Self::Number(n));
        }
        if let Some([a, b]) = value.as_array().map(Vec::as_slice) {
            let second = if b.is_null() { None } else { Some(b.as_f64()?) };
            return Some(Self::Pair(a.as_f64()?, second));
        }
        value
            .get("value")
            .and_then(Json::as_f64)
            .map(Self::Wrapped)
    }

    /// The plotted number: the bare number, the pair's second element, or the wrapped value.
    pub fn number(self) -> Option<f64> {
        match self {
            Self::Number(v) | Self::Wrapped(v) => Some(v),
            Self::Pair(_, v) => v,
        }
    }
}

/// One narrowed tooltip parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipParam {
    /// A value at a category.
    Category {
        /// Series name.
        series_name: String,
        /// Category name.
        name: String,
        /// Engine-provided marker HTML.
        marker: String,
        /// The value, if any.
        value: Option<f64>,
    },
    /// A value at a timestamp.
    Time {
        /// Series name.
        series_name: String,
        /// Engine-provided marker HTML.
        marker: String,
        /// The timestamp.
        timestamp: Timestamp,
        /// The value, if any.
        value: Option<f64>,
    },
    /// A scatter point.
    Scatter {
        /// Series name.
        series_name: String,
        /// Engine-provided marker HTML.
        marker: String,
        /// Horizontal value.
        x: f64,
        /// Vertical value.
        y: f64,
    },
    /// A pie slice.
    Pie {
        /// Slice name.
        name: String,
        /// Engine-provided marker HTML.
        marker: String,
        /// Slice value.
        value: f64,
        /// Share of the whole in percent, when the engine provides it.
        percent: Option<f64>,
    },
}

fn text_field(param: &Json, key: &str) -> Option<String> {
    param.get(key).and_then(Json::as_str).map(String::from)
}

fn timestamp(ms: f64) -> Option<Timestamp> {
    if !ms.is_finite() {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite epoch milliseconds fit in i64; saturating otherwise"
    )]
    let ms = ms as i64;
    Some(Timestamp(ms))
}

impl TooltipParam {
    /// Narrows one engine parameter object.
    ///
    /// The variant is picked from the payload's shape: a `pie` sub-type or a `percent` field
    /// makes a pie slice, a `scatter` sub-type makes a scatter point, a pair value makes a time
    /// point, and anything else is a category value. Returns `None` when a required field
    /// (`seriesName` or `name`, `marker`, `value`) is missing or of the wrong type.
    pub fn from_json(param: &Json) -> Option<Self> {
        let param_obj = param.as_object()?;
        let marker = text_field(param, "marker")?;
        let raw_value = param_obj.get("value")?;
        let sub_type = param.get("componentSubType").and_then(Json::as_str);
        let value = TooltipValue::from_json(raw_value);

        if sub_type == Some("pie") || param_obj.contains_key("percent") {
            return Some(Self::Pie {
                name: text_field(param, "name")?,
                marker,
                value: value?.number()?,
                percent: param.get("percent").and_then(Json::as_f64),
            });
        }

        let series_name = text_field(param, "seriesName")?;
        if sub_type == Some("scatter") {
            let Some(TooltipValue::Pair(x, Some(y))) = value else {
                return None;
            };
            return Some(Self::Scatter {
                series_name,
                marker,
                x,
                y,
            });
        }
        if let Some(TooltipValue::Pair(t, v)) = value {
            return Some(Self::Time {
                series_name,
                marker,
                timestamp: timestamp(t)?,
                value: v.filter(|v| v.is_finite()),
            });
        }
        // Engines send `null` or `"-"` for gaps; those keep the parameter but drop the line.
        Some(Self::Category {
            series_name,
            name: text_field(param, "name")?,
            marker,
            value: value.and_then(TooltipValue::number).filter(|v| v.is_finite()),
        })
    }

    /// Series name, or the slice name for pie slices.
    pub fn series_name(&self) -> &str {
        match self {
            Self::Category { series_name, .. }
            | Self::Time { series_name, .. }
            | Self::Scatter { series_name, .. } => series_name,
            Self::Pie { name, .. } => name,
        }
    }

    /// The marker HTML.
    pub fn marker(&self) -> &str {
        match self {
            Self::Category { marker, .. }
            | Self::Time { marker, .. }
            | Self::Scatter { marker, .. }
            | Self::Pie { marker, .. } => marker,
        }
    }

    /// The displayed value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Category { value, .. } | Self::Time { value, .. } => *value,
            Self::Scatter { y, .. } => Some(*y),
            Self::Pie { value, .. } => Some(*value),
        }
    }
}

/// Normalizes a payload to its parameter list: an object is a one-element list.
///
/// Returns `None` for anything but an object or array.
fn raw_params(payload: &Json) -> Option<SmallVec<[&Json; 4]>> {
    match payload {
        Json::Array(items) => Some(items.iter().collect()),
        Json::Object(_) => Some(smallvec::smallvec![payload]),
        _ => None,
    }
}

/// Narrows a payload into its valid parameters, each paired with its series index.
///
/// The index is the parameter's `seriesIndex`, or its position in the payload when the engine
/// leaves it out.
fn indexed_params(payload: &Json) -> Vec<(usize, TooltipParam)> {
    let Some(raw) = raw_params(payload) else {
        log::trace!("tooltip payload is neither an object nor an array");
        return Vec::new();
    };
    raw.into_iter()
        .enumerate()
        .filter_map(|(position, p)| {
            let Some(parsed) = TooltipParam::from_json(p) else {
                log::trace!("skipping malformed tooltip parameter {p}");
                return None;
            };
            let index = p
                .get("seriesIndex")
                .and_then(Json::as_u64)
                .and_then(|i| usize::try_from(i).ok())
                .unwrap_or(position);
            Some((index, parsed))
        })
        .collect()
}

/// Narrows a payload into its valid parameters, dropping invalid ones.
pub fn parse_params(payload: &Json) -> Vec<TooltipParam> {
    indexed_params(payload).into_iter().map(|(_, p)| p).collect()
}

/// Value formatting options shared by the formatter factories.
#[derive(Clone)]
pub struct TooltipOptions {
    /// Unit appended to values. Escaped on output.
    pub unit: String,
    /// Maximum fraction digits for the default number formatting.
    pub decimals: usize,
    /// Whether negative values are skipped like missing ones.
    pub skip_negative: bool,
    /// Custom value formatting, replacing the default.
    pub value_formatter: Option<ValueFormatter>,
    /// Timestamp header granularity for time series tooltips.
    pub granularity: TimeGranularity,
}

impl core::fmt::Debug for TooltipOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TooltipOptions")
            .field("unit", &self.unit)
            .field("decimals", &self.decimals)
            .field("skip_negative", &self.skip_negative)
            .field("value_formatter", &self.value_formatter.is_some())
            .field("granularity", &self.granularity)
            .finish()
    }
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            unit: String::new(),
            decimals: 2,
            skip_negative: false,
            value_formatter: None,
            granularity: TimeGranularity::Day,
        }
    }
}

impl TooltipOptions {
    /// Sets the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the maximum fraction digits.
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Skips negative values.
    pub fn with_skip_negative(mut self, skip_negative: bool) -> Self {
        self.skip_negative = skip_negative;
        self
    }

    /// Sets a custom value formatter.
    pub fn with_value_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.value_formatter = Some(formatter);
        self
    }

    /// Sets the timestamp header granularity.
    pub fn with_granularity(mut self, granularity: TimeGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Formats `value` with unit, or `None` when it should be skipped.
    fn display(&self, value: Option<f64>) -> Option<String> {
        let v = value.filter(|v| v.is_finite())?;
        if self.skip_negative && v < 0.0 {
            return None;
        }
        let mut out = match &self.value_formatter {
            Some(f) => escape_html(&f(v)),
            None => format_number(v, self.decimals),
        };
        out.push_str(&escape_html(&self.unit));
        Some(out)
    }
}

fn value_line(param: &TooltipParam, options: &TooltipOptions) -> Option<String> {
    let shown = options.display(param.value())?;
    Some(alloc::format!(
        "{}{}: <b>{}</b>",
        param.marker(),
        escape_html(param.series_name()),
        shown
    ))
}

fn with_lines(header: String, lines: impl Iterator<Item = String>) -> String {
    let mut out = header;
    for line in lines {
        out.push_str("<br/>");
        out.push_str(&line);
    }
    out
}

fn category_header(param: &TooltipParam, options: &TooltipOptions) -> Option<String> {
    match param {
        TooltipParam::Category { name, .. } => Some(escape_html(name)),
        TooltipParam::Time { timestamp, .. } => {
            Some(escape_html(&format_timestamp(*timestamp, options.granularity)))
        }
        TooltipParam::Scatter { .. } | TooltipParam::Pie { .. } => None,
    }
}

/// An axis tooltip for category charts.
///
/// The first parameter's category is the header; each series contributes a
/// `marker name: <b>value unit</b>` line.
pub fn category_tooltip(options: TooltipOptions) -> TooltipFormatter {
    Arc::new(move |payload| {
        let params = parse_params(payload);
        let Some(header) = params.first().and_then(|p| category_header(p, &options)) else {
            return String::new();
        };
        with_lines(header, params.iter().filter_map(|p| value_line(p, &options)))
    })
}

/// An axis tooltip for time series charts.
///
/// The header is the first parameter's timestamp at `options.granularity`, or its category
/// name when the time axis is rendered as pre-formatted categories.
pub fn time_series_tooltip(options: TooltipOptions) -> TooltipFormatter {
    category_tooltip(options)
}

/// An item tooltip for scatter charts: series name header, then the `x` and `y` values under
/// the given axis labels.
pub fn scatter_tooltip(
    x_label: impl Into<String>,
    y_label: impl Into<String>,
    options: TooltipOptions,
) -> TooltipFormatter {
    let x_label = escape_html(&x_label.into());
    let y_label = escape_html(&y_label.into());
    Arc::new(move |payload| {
        let params = parse_params(payload);
        let Some(TooltipParam::Scatter {
            series_name,
            marker,
            x,
            y,
        }) = params.first()
        else {
            return String::new();
        };
        let (Some(x), Some(y)) = (options.display(Some(*x)), options.display(Some(*y))) else {
            return String::new();
        };
        alloc::format!(
            "{marker}{}<br/>{x_label}: <b>{x}</b><br/>{y_label}: <b>{y}</b>",
            escape_html(series_name)
        )
    })
}

/// An item tooltip for pie charts: `marker name: <b>value unit</b> (percent%)`.
pub fn pie_tooltip(options: TooltipOptions) -> TooltipFormatter {
    Arc::new(move |payload| {
        let params = parse_params(payload);
        let Some(
            param @ TooltipParam::Pie {
                percent,
                ..
            },
        ) = params.first()
        else {
            return String::new();
        };
        let Some(mut line) = value_line(param, &options) else {
            return String::new();
        };
        if let Some(p) = percent.filter(|p| p.is_finite()) {
            line.push_str(&alloc::format!(" ({}%)", format_number(p, 1)));
        }
        line
    })
}

/// An axis tooltip for dual-axis charts.
///
/// Series whose index is in `right_series` are formatted with `right`, all others with
/// `left`, so each value carries its own axis's unit and precision. Series are matched by
/// index, so two series may share a name.
pub fn dual_axis_tooltip(
    left: TooltipOptions,
    right: TooltipOptions,
    right_series: &[usize],
) -> TooltipFormatter {
    let right_series: HashSet<usize> = right_series.iter().copied().collect();
    Arc::new(move |payload| {
        let params = indexed_params(payload);
        let Some(header) = params.first().and_then(|(_, p)| category_header(p, &left)) else {
            return String::new();
        };
        with_lines(
            header,
            params.iter().filter_map(|(index, p)| {
                let options = if right_series.contains(index) {
                    &right
                } else {
                    &left
                };
                value_line(p, options)
            }),
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const M: &str = "<span class=\"m\"></span>";

    #[test]
    fn value_shapes_are_detected_in_priority_order() {
        assert_eq!(TooltipValue::from_json(&json!(3.5)), Some(TooltipValue::Number(3.5)));
        assert_eq!(
            TooltipValue::from_json(&json!([1000, 2.0])),
            Some(TooltipValue::Pair(1000.0, Some(2.0)))
        );
        assert_eq!(
            TooltipValue::from_json(&json!([1000, null])),
            Some(TooltipValue::Pair(1000.0, None))
        );
        assert_eq!(TooltipValue::from_json(&json!([1000, "x"])), None);
        assert_eq!(
            TooltipValue::from_json(&json!({ "value": 7 })),
            Some(TooltipValue::Wrapped(7.0))
        );
        assert_eq!(TooltipValue::from_json(&json!("-")), None);
        assert_eq!(TooltipValue::from_json(&json!([1, 2, 3])), None);
    }

    #[test]
    fn category_tooltip_lists_series_and_skips_gaps() {
        let f = category_tooltip(TooltipOptions::default().with_unit(" t"));
        let payload = json!([
            { "seriesName": "S1", "name": "A", "marker": M, "value": 1234.5 },
            { "seriesName": "S2", "name": "A", "marker": M, "value": null },
            { "seriesName": "S3", "name": "A", "marker": M, "value": { "value": 2 } },
        ]);
        assert_eq!(
            f(&payload),
            alloc::format!("A<br/>{M}S1: <b>1,234.5 t</b><br/>{M}S3: <b>2 t</b>")
        );
    }

    #[test]
    fn single_object_is_a_one_element_list() {
        let f = category_tooltip(TooltipOptions::default());
        let payload = json!({ "seriesName": "S1", "name": "A", "marker": M, "value": 1 });
        assert_eq!(f(&payload), alloc::format!("A<br/>{M}S1: <b>1</b>"));
    }

    #[test]
    fn malformed_input_fails_soft() {
        let f = category_tooltip(TooltipOptions::default());
        assert_eq!(f(&json!(null)), "");
        assert_eq!(f(&json!("text")), "");
        assert_eq!(f(&json!([])), "");
        assert_eq!(f(&json!([{ "seriesName": "S1", "value": 1 }])), "");
    }

    #[test]
    fn negative_values_can_be_skipped() {
        let f = category_tooltip(TooltipOptions::default().with_skip_negative(true));
        let payload = json!([
            { "seriesName": "up", "name": "A", "marker": "", "value": 1 },
            { "seriesName": "down", "name": "A", "marker": "", "value": -1 },
        ]);
        assert_eq!(f(&payload), "A<br/>up: <b>1</b>");
    }

    #[test]
    fn data_text_is_escaped() {
        let f = category_tooltip(TooltipOptions::default());
        let payload = json!([{
            "seriesName": "<script>alert(1)</script>",
            "name": "a&b",
            "marker": M,
            "value": 1,
        }]);
        let out = f(&payload);
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.starts_with("a&amp;b"));
        assert!(out.contains(M));
    }

    #[test]
    fn time_series_header_is_the_formatted_timestamp() {
        let f = time_series_tooltip(TooltipOptions::default().with_granularity(TimeGranularity::Year));
        // 2024-01-01T00:00:00Z
        let payload = json!([{ "seriesName": "A", "marker": "", "value": [1_704_067_200_000_i64, 10] }]);
        assert_eq!(f(&payload), "2024<br/>A: <b>10</b>");
    }

    #[test]
    fn leading_time_series_gap_keeps_the_timestamp_header() {
        let f = time_series_tooltip(TooltipOptions::default().with_granularity(TimeGranularity::Year));
        let payload = json!([
            { "seriesName": "A", "name": "", "marker": "", "value": [1_704_067_200_000_i64, null] },
            { "seriesName": "B", "name": "", "marker": "", "value": [1_704_067_200_000_i64, 5] },
        ]);
        assert_eq!(f(&payload), "2024<br/>B: <b>5</b>");
        assert_eq!(
            TooltipParam::from_json(&payload[0]),
            Some(TooltipParam::Time {
                series_name: String::from("A"),
                marker: String::new(),
                timestamp: Timestamp(1_704_067_200_000),
                value: None,
            })
        );
    }

    #[test]
    fn scatter_and_pie_tooltips() {
        let scatter = scatter_tooltip("GDP", "Life", TooltipOptions::default().with_decimals(1));
        let payload = json!({
            "componentSubType": "scatter",
            "seriesName": "EU",
            "marker": "",
            "value": [1.26, 80],
        });
        assert_eq!(scatter(&payload), "EU<br/>GDP: <b>1.3</b><br/>Life: <b>80</b>");

        let pie = pie_tooltip(TooltipOptions::default().with_unit("%"));
        let payload = json!({ "name": "Rail", "marker": "", "value": 40, "percent": 33.33 });
        assert_eq!(pie(&payload), "Rail: <b>40%</b> (33.3%)");
    }

    #[test]
    fn dual_axis_uses_each_sides_options() {
        let f = dual_axis_tooltip(
            TooltipOptions::default().with_unit(" t"),
            TooltipOptions::default().with_unit("%").with_decimals(1),
            &[1],
        );
        let payload = json!([
            { "seriesName": "Count", "name": "2024", "marker": "", "value": 10 },
            { "seriesName": "Rate", "name": "2024", "marker": "", "value": 0.26 },
        ]);
        assert_eq!(f(&payload), "2024<br/>Count: <b>10 t</b><br/>Rate: <b>0.3%</b>");
    }

    #[test]
    fn dual_axis_matches_series_by_index_not_name() {
        let f = dual_axis_tooltip(
            TooltipOptions::default().with_unit(" t"),
            TooltipOptions::default().with_unit("%"),
            &[1],
        );
        let payload = json!([
            { "seriesName": "Sales", "seriesIndex": 1, "name": "Q1", "marker": "", "value": 4 },
            { "seriesName": "Sales", "seriesIndex": 0, "name": "Q1", "marker": "", "value": 9 },
        ]);
        assert_eq!(f(&payload), "Q1<br/>Sales: <b>4%</b><br/>Sales: <b>9 t</b>");
    }
}

// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime checks on incoming data, numbers, and axis domains.
//!
//! Checks return a [`ValidationReport`] instead of failing; callers decide whether to proceed.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use cubeviz_core::Observation;
use serde_json::Value as Json;
use thiserror::Error;

/// A single validation finding.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ValidationIssue {
    /// The data payload is not an array.
    #[error("data must be an array, found {found}")]
    NotAnArray {
        /// JSON type of the payload.
        found: &'static str,
    },

    /// There is no data.
    #[error("data is empty")]
    EmptyData,

    /// An observation lacks a column the chart reads.
    #[error("observation {index} is missing column `{column}`")]
    MissingColumn {
        /// Observation index.
        index: usize,
        /// Column id.
        column: String,
    },

    /// A required number is absent.
    #[error("{label} is missing")]
    MissingNumber {
        /// What the number is.
        label: String,
    },

    /// A required number is NaN or infinite.
    #[error("{label} must be finite, got {value}")]
    NonFinite {
        /// What the number is.
        label: String,
        /// The offending value.
        value: f64,
    },

    /// An axis domain runs backwards.
    #[error("axis domain is inverted: min {min} > max {max}")]
    InvertedDomain {
        /// Domain minimum.
        min: f64,
        /// Domain maximum.
        max: f64,
    },

    /// An axis domain has zero width.
    #[error("axis domain has zero width at {value}")]
    ZeroWidthDomain {
        /// The single domain value.
        value: f64,
    },

    /// A series has no points.
    #[error("series `{name}` is empty")]
    EmptySeries {
        /// Series name.
        name: String,
    },

    /// A series has points but none has a value.
    #[error("series `{name}` has only missing values")]
    AllMissingSeries {
        /// Series name.
        name: String,
    },

    /// A series point is NaN or infinite.
    #[error("series `{name}` has a non-finite value at {index}")]
    NonFiniteSeriesValue {
        /// Series name.
        name: String,
        /// Point index.
        index: usize,
    },
}

/// Errors and warnings from one or more checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    /// Findings that make the input unusable.
    pub errors: Vec<ValidationIssue>,
    /// Findings worth surfacing that do not block rendering.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// An empty, valid report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when there are no errors. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records an error.
    pub fn error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    /// Records a warning.
    pub fn warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Appends another report's findings.
    pub fn merge(mut self, other: Self) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    fn logged(self, what: &str) -> Self {
        if !self.errors.is_empty() {
            log::debug!("{what}: {} validation error(s): {:?}", self.errors.len(), self.errors);
        }
        self
    }
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Checks that an untyped data payload is an array. An empty array is a warning.
pub fn validate_data_array(data: &Json) -> ValidationReport {
    let mut report = ValidationReport::new();
    match data {
        Json::Array(items) if items.is_empty() => report.warning(ValidationIssue::EmptyData),
        Json::Array(_) => {}
        other => report.error(ValidationIssue::NotAnArray {
            found: json_type(other),
        }),
    }
    report.logged("data array")
}

/// Checks that every observation carries every `required` column.
///
/// No observations at all is a warning; an empty chart is still a valid chart.
pub fn validate_observations(observations: &[Observation], required: &[&str]) -> ValidationReport {
    let mut report = ValidationReport::new();
    if observations.is_empty() {
        report.warning(ValidationIssue::EmptyData);
    }
    for (index, d) in observations.iter().enumerate() {
        for column in required {
            if !d.has(column) {
                report.error(ValidationIssue::MissingColumn {
                    index,
                    column: String::from(*column),
                });
            }
        }
    }
    report.logged("observations")
}

/// Checks that a required number is present and finite.
pub fn validate_numeric(label: &str, value: Option<f64>) -> ValidationReport {
    let mut report = ValidationReport::new();
    match value {
        None => report.error(ValidationIssue::MissingNumber {
            label: String::from(label),
        }),
        Some(v) if !v.is_finite() => report.error(ValidationIssue::NonFinite {
            label: String::from(label),
            value: v,
        }),
        Some(_) => {}
    }
    report.logged(label)
}

/// Checks an axis domain: both ends finite and `min <= max`. Zero width is a warning.
pub fn validate_axis_domain(min: f64, max: f64) -> ValidationReport {
    let mut report =
        validate_numeric("axis min", Some(min)).merge(validate_numeric("axis max", Some(max)));
    if !report.is_valid() {
        return report;
    }
    if min > max {
        report.error(ValidationIssue::InvertedDomain { min, max });
    } else if min == max {
        report.warning(ValidationIssue::ZeroWidthDomain { value: min });
    }
    report.logged("axis domain")
}

/// Checks built series values: present values must be finite. Empty or all-missing series are
/// warnings.
pub fn validate_series_values(name: &str, values: &[Option<f64>]) -> ValidationReport {
    let mut report = ValidationReport::new();
    if values.is_empty() {
        report.warning(ValidationIssue::EmptySeries {
            name: String::from(name),
        });
        return report;
    }
    if values.iter().all(Option::is_none) {
        report.warning(ValidationIssue::AllMissingSeries {
            name: String::from(name),
        });
    }
    for (index, v) in values.iter().enumerate() {
        if v.is_some_and(|v| !v.is_finite()) {
            report.error(ValidationIssue::NonFiniteSeriesValue {
                name: String::from(name),
                index,
            });
        }
    }
    report.logged(name)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use serde_json::json;

    use super::*;

    #[test]
    fn data_must_be_an_array() {
        let report = validate_data_array(&json!({ "a": 1 }));
        assert!(!report.is_valid());
        assert_eq!(report.errors, [ValidationIssue::NotAnArray { found: "object" }]);

        let empty = validate_data_array(&json!([]));
        assert!(empty.is_valid());
        assert_eq!(empty.warnings, [ValidationIssue::EmptyData]);

        assert_eq!(validate_data_array(&json!([1, 2])), ValidationReport::new());
    }

    #[test]
    fn observations_need_required_columns() {
        let data = [
            Observation::new().with("cat", "A").with("v", 1.0),
            Observation::new().with("cat", "B"),
        ];
        let report = validate_observations(&data, &["cat", "v"]);
        assert_eq!(
            report.errors,
            [ValidationIssue::MissingColumn {
                index: 1,
                column: "v".into()
            }]
        );
        assert!(validate_observations(&[], &["v"]).is_valid());
    }

    #[test]
    fn numbers_and_domains() {
        assert!(validate_numeric("width", Some(10.0)).is_valid());
        assert!(!validate_numeric("width", None).is_valid());
        let nan = validate_numeric("width", Some(f64::NAN));
        assert!(nan.errors[0].to_string().contains("width must be finite"));

        assert!(!validate_axis_domain(10.0, 0.0).is_valid());
        let flat = validate_axis_domain(3.0, 3.0);
        assert!(flat.is_valid());
        assert_eq!(flat.warnings.len(), 1);
        assert_eq!(validate_axis_domain(f64::INFINITY, 1.0).errors.len(), 1);
    }

    #[test]
    fn series_values_and_merge() {
        let gaps = validate_series_values("S1", &[None, None]);
        assert!(gaps.is_valid());
        assert_eq!(gaps.warnings.len(), 1);

        let bad = validate_series_values("S2", &[Some(1.0), Some(f64::NAN)]);
        assert!(!bad.is_valid());

        let merged = gaps.merge(bad);
        assert_eq!(merged.errors.len(), 1);
        assert_eq!(merged.warnings.len(), 1);
    }
}

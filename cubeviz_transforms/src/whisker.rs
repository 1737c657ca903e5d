// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error-whisker row building.
//!
//! Whisker overlays are sparse: only cells whose observation reports an error interval produce
//! a row. Absent cells are omitted, never null-filled.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use cubeviz_core::Observation;

use crate::category::{find_by_category, find_by_category_and_segment};

/// One uncertainty interval positioned on a category axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorWhiskerDatum {
    /// Category index, shifted by the grouped offset for grouped families.
    pub position: f64,
    /// Lower bound in data units.
    pub low: f64,
    /// Upper bound in data units.
    pub high: f64,
    /// Segment index for grouped families.
    pub segment: Option<usize>,
}

impl ErrorWhiskerDatum {
    /// Returns the array form: `[position, low, high]`, or `[position, low, high, segment]` for
    /// grouped families.
    pub fn to_vec(&self) -> Vec<f64> {
        match self.segment {
            None => vec![self.position, self.low, self.high],
            Some(s) => vec![self.position, self.low, self.high, s as f64],
        }
    }
}

/// Offset, in category units, that centers segment `segment_index` of `segment_count` under
/// its bar within a grouped family.
///
/// `(segment_index - (segment_count - 1) / 2) / segment_count`; zero when there are no segments.
pub fn grouped_offset(segment_index: usize, segment_count: usize) -> f64 {
    if segment_count == 0 {
        return 0.0;
    }
    let n = segment_count as f64;
    (segment_index as f64 - (n - 1.0) / 2.0) / n
}

fn interval(
    d: &Observation,
    error_present: &impl Fn(&Observation) -> Option<bool>,
    error_range: &impl Fn(&Observation) -> Option<(f64, f64)>,
) -> Option<(f64, f64)> {
    if error_present(d) != Some(true) {
        return None;
    }
    match error_range(d) {
        Some((low, high)) if low.is_finite() && high.is_finite() => Some((low, high)),
        _ => {
            log::trace!("error whisker: flagged observation without a finite range");
            None
        }
    }
}

/// Builds whisker rows for a single-series category chart.
pub fn build_error_whisker_data<S: AsRef<str>>(
    observations: &[Observation],
    categories: &[S],
    category: impl Fn(&Observation) -> Option<String>,
    error_present: impl Fn(&Observation) -> Option<bool>,
    error_range: impl Fn(&Observation) -> Option<(f64, f64)>,
) -> Vec<ErrorWhiskerDatum> {
    find_by_category(observations, categories, category)
        .into_iter()
        .enumerate()
        .filter_map(|(i, d)| {
            let (low, high) = interval(d?, &error_present, &error_range)?;
            Some(ErrorWhiskerDatum {
                position: i as f64,
                low,
                high,
                segment: None,
            })
        })
        .collect()
}

/// Builds whisker rows for a grouped (or stacked) category chart.
///
/// Rows are emitted category-major, then segment. Each row's position is the category index
/// shifted by [`grouped_offset`] so whiskers sit under their own bar.
pub fn build_grouped_error_whisker_data<C: AsRef<str>, S: AsRef<str>>(
    observations: &[Observation],
    categories: &[C],
    segments: &[S],
    category: impl Fn(&Observation) -> Option<String>,
    segment: impl Fn(&Observation) -> Option<String>,
    error_present: impl Fn(&Observation) -> Option<bool>,
    error_range: impl Fn(&Observation) -> Option<(f64, f64)>,
) -> Vec<ErrorWhiskerDatum> {
    let cells =
        find_by_category_and_segment(observations, categories, segments, category, segment);
    let segment_count = segments.len();
    let mut out = Vec::new();
    for ci in 0..categories.len() {
        for (si, row) in cells.iter().enumerate() {
            let Some(d) = row[ci] else {
                continue;
            };
            if let Some((low, high)) = interval(d, &error_present, &error_range) {
                out.push(ErrorWhiskerDatum {
                    position: ci as f64 + grouped_offset(si, segment_count),
                    low,
                    high,
                    segment: Some(si),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use cubeviz_core::{flag_column, range_columns, text_column};

    fn obs(cat: &str, seg: &str, ci: Option<(f64, f64)>) -> Observation {
        let d = Observation::new().with("cat", cat).with("seg", seg);
        match ci {
            Some((lo, hi)) => d.with("has_ci", 1.0).with("lo", lo).with("hi", hi),
            None => d,
        }
    }

    #[test]
    fn only_flagged_categories_contribute() {
        let data = [
            obs("A", "S1", Some((5.0, 15.0))),
            obs("B", "S1", None),
            obs("C", "S1", Some((10.0, 20.0))),
        ];
        let rows = build_error_whisker_data(
            &data,
            &["A", "B", "C"],
            &*text_column("cat"),
            &*flag_column("has_ci"),
            &*range_columns("lo", "hi"),
        );
        let arrays: Vec<Vec<f64>> = rows.iter().map(ErrorWhiskerDatum::to_vec).collect();
        assert_eq!(arrays, [vec![0.0, 5.0, 15.0], vec![2.0, 10.0, 20.0]]);
    }

    #[test]
    fn grouped_offsets_are_centered() {
        let eps = 1e-12;
        assert!((grouped_offset(0, 3) + 1.0 / 3.0).abs() < eps);
        assert!(grouped_offset(1, 3).abs() < eps);
        assert!((grouped_offset(2, 3) - 1.0 / 3.0).abs() < eps);
        assert!((grouped_offset(0, 2) + 0.25).abs() < eps);
        assert_eq!(grouped_offset(0, 0), 0.0);
    }

    #[test]
    fn grouped_rows_carry_offset_position_and_segment_index() {
        let data = [
            obs("A", "S1", Some((1.0, 2.0))),
            obs("A", "S2", Some((3.0, 4.0))),
            obs("B", "S2", Some((5.0, 6.0))),
        ];
        let rows = build_grouped_error_whisker_data(
            &data,
            &["A", "B"],
            &["S1", "S2"],
            &*text_column("cat"),
            &*text_column("seg"),
            &*flag_column("has_ci"),
            &*range_columns("lo", "hi"),
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].to_vec(), [-0.25, 1.0, 2.0, 0.0]);
        assert_eq!(rows[1].to_vec(), [0.25, 3.0, 4.0, 1.0]);
        assert_eq!(rows[2].to_vec(), [1.25, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn flagged_row_without_range_is_omitted() {
        let data = [Observation::new().with("cat", "A").with("has_ci", 1.0)];
        let rows = build_error_whisker_data(
            &data,
            &["A"],
            &*text_column("cat"),
            &*flag_column("has_ci"),
            &*range_columns("lo", "hi"),
        );
        assert!(rows.is_empty());
    }
}

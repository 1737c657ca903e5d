// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category and category-by-segment lookup.
//!
//! Lookups use first-match semantics: when several observations share a category (or a
//! `(category, segment)` pair), only the first one in input order is used. Cube queries are
//! expected to arrive pre-aggregated; duplicates are not summed or averaged.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use cubeviz_core::Observation;
use hashbrown::HashMap;

use crate::keys::SegmentValues;

/// Finds the first observation for each category in `categories`.
///
/// The output is aligned with `categories`; categories without a match map to `None`.
/// Repeated entries in `categories` are not de-duplicated: each occurrence resolves to the same
/// first match.
pub fn find_by_category<'a, S: AsRef<str>>(
    observations: &'a [Observation],
    categories: &[S],
    category: impl Fn(&Observation) -> Option<String>,
) -> Vec<Option<&'a Observation>> {
    let mut first: HashMap<String, &'a Observation> = HashMap::new();
    for d in observations {
        if let Some(c) = category(d) {
            first.entry(c).or_insert(d);
        }
    }
    categories
        .iter()
        .map(|c| first.get(c.as_ref()).copied())
        .collect()
}

/// Reads one value per category, aligned with `categories`.
pub fn category_values<S: AsRef<str>>(
    observations: &[Observation],
    categories: &[S],
    category: impl Fn(&Observation) -> Option<String>,
    value: impl Fn(&Observation) -> Option<f64>,
) -> Vec<Option<f64>> {
    find_by_category(observations, categories, category)
        .into_iter()
        .map(|d| d.and_then(&value))
        .collect()
}

/// Finds the first observation for each `(category, segment)` cell.
///
/// The output is indexed `[segment][category]`, aligned with `segments` and `categories`.
pub fn find_by_category_and_segment<'a, C: AsRef<str>, S: AsRef<str>>(
    observations: &'a [Observation],
    categories: &[C],
    segments: &[S],
    category: impl Fn(&Observation) -> Option<String>,
    segment: impl Fn(&Observation) -> Option<String>,
) -> Vec<Vec<Option<&'a Observation>>> {
    let mut cells: HashMap<String, HashMap<String, &'a Observation>> = HashMap::new();
    for d in observations {
        let (Some(c), Some(s)) = (category(d), segment(d)) else {
            continue;
        };
        cells.entry(c).or_default().entry(s).or_insert(d);
    }
    segments
        .iter()
        .map(|s| {
            categories
                .iter()
                .map(|c| {
                    cells
                        .get(c.as_ref())
                        .and_then(|by_segment| by_segment.get(s.as_ref()))
                        .copied()
                })
                .collect()
        })
        .collect()
}

/// Pivots observations into one aligned value row per segment.
///
/// This is the input shape for grouped and stacked bar families.
pub fn segment_values<C: AsRef<str>, S: AsRef<str>>(
    observations: &[Observation],
    categories: &[C],
    segments: &[S],
    category: impl Fn(&Observation) -> Option<String>,
    segment: impl Fn(&Observation) -> Option<String>,
    value: impl Fn(&Observation) -> Option<f64>,
) -> Vec<SegmentValues> {
    find_by_category_and_segment(observations, categories, segments, category, segment)
        .into_iter()
        .zip(segments)
        .map(|(row, s)| {
            SegmentValues::new(
                s.as_ref(),
                row.into_iter().map(|d| d.and_then(&value)).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use cubeviz_core::{number_column, text_column};

    fn obs(cat: &str, seg: &str, v: f64) -> Observation {
        Observation::new()
            .with("cat", cat)
            .with("seg", seg)
            .with("v", v)
    }

    fn sample() -> Vec<Observation> {
        alloc::vec![
            obs("A", "S1", 10.0),
            obs("A", "S2", 15.0),
            obs("B", "S1", 20.0),
            obs("B", "S2", 25.0),
        ]
    }

    #[test]
    fn pivot_by_segment_yields_one_row_per_segment() {
        let data = sample();
        let rows = segment_values(
            &data,
            &["A", "B"],
            &["S1", "S2"],
            &*text_column("cat"),
            &*text_column("seg"),
            &*number_column("v"),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].segment, "S1");
        assert_eq!(rows[0].values, [Some(10.0), Some(20.0)]);
        assert_eq!(rows[1].segment, "S2");
        assert_eq!(rows[1].values, [Some(15.0), Some(25.0)]);
    }

    #[test]
    fn unmatched_categories_map_to_none() {
        let data = sample();
        let found = find_by_category(&data, &["B", "Z"], &*text_column("cat"));
        assert_eq!(found[0].and_then(|d| d.number("v")), Some(20.0));
        assert!(found[1].is_none());
    }

    #[test]
    fn first_match_wins_and_duplicates_are_kept() {
        let data = sample();
        let values = category_values(
            &data,
            &["A", "A"],
            &*text_column("cat"),
            &*number_column("v"),
        );
        assert_eq!(values, [Some(10.0), Some(10.0)]);
    }

    #[test]
    fn empty_observations_give_all_none() {
        let rows = segment_values(
            &[],
            &["A"],
            &["S1"],
            &*text_column("cat"),
            &*text_column("seg"),
            &*number_column("v"),
        );
        assert_eq!(rows[0].values, [None]);
    }
}

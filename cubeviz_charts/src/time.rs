// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timestamp formatting helpers.
//!
//! This is intentionally small and `no_std`-friendly. Timestamps are UTC epoch milliseconds and
//! are rendered at a granularity that matches the data (statistical cubes are mostly yearly,
//! quarterly or monthly):
//! - `2024`, `2024-Q1`, `2024-03`, `2024-03-01`, `2024-03-01 14:05`

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use cubeviz_core::Timestamp;

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_DAY: i64 = 86_400_000;

/// The resolution a timestamp is rendered at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeGranularity {
    /// `2024`
    Year,
    /// `2024-Q1`
    Quarter,
    /// `2024-03`
    Month,
    /// `2024-03-01`
    Day,
    /// `2024-03-01 14:05`
    Minute,
}

/// Broken-down UTC civil time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CivilTime {
    year: i64,
    month: i64,
    day: i64,
    ms_of_day: i64,
}

impl CivilTime {
    fn from_timestamp(t: Timestamp) -> Self {
        let ms = t.millis();
        let days = ms.div_euclid(MS_PER_DAY);
        let ms_of_day = ms.rem_euclid(MS_PER_DAY);

        // Days-to-civil over 400-year eras, with years starting in March.
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self {
            year,
            month,
            day,
            ms_of_day,
        }
    }
}

/// Formats `t` at the given granularity.
pub fn format_timestamp(t: Timestamp, granularity: TimeGranularity) -> String {
    let c = CivilTime::from_timestamp(t);
    match granularity {
        TimeGranularity::Year => alloc::format!("{}", c.year),
        TimeGranularity::Quarter => alloc::format!("{}-Q{}", c.year, (c.month - 1) / 3 + 1),
        TimeGranularity::Month => alloc::format!("{}-{:02}", c.year, c.month),
        TimeGranularity::Day => alloc::format!("{}-{:02}-{:02}", c.year, c.month, c.day),
        TimeGranularity::Minute => {
            let minute_of_day = c.ms_of_day / MS_PER_MINUTE;
            alloc::format!(
                "{}-{:02}-{:02} {:02}:{:02}",
                c.year,
                c.month,
                c.day,
                minute_of_day / 60,
                minute_of_day % 60
            )
        }
    }
}

/// Picks the coarsest granularity that still distinguishes every timestamp.
///
/// - any timestamp off midnight: `Minute`
/// - all on the first of January: `Year`
/// - all on the first of a quarter month: `Quarter`
/// - all on the first of a month: `Month`
/// - otherwise `Day` (also for an empty input)
pub fn infer_granularity(timestamps: &[Timestamp]) -> TimeGranularity {
    if timestamps.is_empty() {
        return TimeGranularity::Day;
    }
    let civil: Vec<CivilTime> = timestamps
        .iter()
        .map(|t| CivilTime::from_timestamp(*t))
        .collect();

    if civil.iter().any(|c| c.ms_of_day != 0) {
        TimeGranularity::Minute
    } else if civil.iter().any(|c| c.day != 1) {
        TimeGranularity::Day
    } else if civil.iter().all(|c| c.month == 1) {
        TimeGranularity::Year
    } else if civil.iter().all(|c| (c.month - 1) % 3 == 0) {
        TimeGranularity::Quarter
    } else {
        TimeGranularity::Month
    }
}

/// Formats an ordered timestamp axis using [`infer_granularity`].
pub fn format_time_labels(timestamps: &[Timestamp]) -> Vec<String> {
    let granularity = infer_granularity(timestamps);
    timestamps
        .iter()
        .map(|t| format_timestamp(*t, granularity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-01T00:00:00Z
    const MAR_1_2024: i64 = 1_709_251_200_000;

    #[test]
    fn epoch_and_leap_day_convert_to_civil_dates() {
        assert_eq!(
            format_timestamp(Timestamp(0), TimeGranularity::Minute),
            "1970-01-01 00:00"
        );
        let leap_day = Timestamp(MAR_1_2024 - MS_PER_DAY);
        assert_eq!(format_timestamp(leap_day, TimeGranularity::Day), "2024-02-29");
        assert_eq!(
            format_timestamp(Timestamp(-MS_PER_DAY), TimeGranularity::Day),
            "1969-12-31"
        );
    }

    #[test]
    fn granularity_formats() {
        let t = Timestamp(MAR_1_2024 + 14 * 3_600_000 + 5 * MS_PER_MINUTE);
        assert_eq!(format_timestamp(t, TimeGranularity::Year), "2024");
        assert_eq!(format_timestamp(t, TimeGranularity::Quarter), "2024-Q1");
        assert_eq!(format_timestamp(t, TimeGranularity::Month), "2024-03");
        assert_eq!(format_timestamp(t, TimeGranularity::Minute), "2024-03-01 14:05");
    }

    #[test]
    fn infers_coarsest_distinguishing_granularity() {
        // 2023-01-01 and 2024-01-01.
        let years = [Timestamp(1_672_531_200_000), Timestamp(1_704_067_200_000)];
        assert_eq!(infer_granularity(&years), TimeGranularity::Year);
        assert_eq!(format_time_labels(&years), ["2023", "2024"]);

        let months = [Timestamp(1_704_067_200_000), Timestamp(MAR_1_2024)];
        assert_eq!(infer_granularity(&months), TimeGranularity::Month);

        let days = [Timestamp(MAR_1_2024 + MS_PER_DAY)];
        assert_eq!(infer_granularity(&days), TimeGranularity::Day);

        assert_eq!(infer_granularity(&[Timestamp(1000)]), TimeGranularity::Minute);
    }
}

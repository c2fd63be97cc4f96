//! Dashboard aggregation math: calendar-month buckets, trend direction,
//! and category percentage shares.
//!
//! Bucket counts are supplied by the caller from server-side COUNT queries;
//! nothing here ever groups fetched rows, so counts stay exact no matter
//! how large the ledger grows.

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of trailing calendar-month buckets.
pub const DEFAULT_TREND_MONTHS: u32 = 6;

// ---------------------------------------------------------------------------
// Month windows
// ---------------------------------------------------------------------------

/// One calendar-month bucket: `[start, end)` in local dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    /// First day of the month.
    pub start: NaiveDate,
    /// First day of the following month (exclusive bound).
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Bucket label in `YYYY-MM` form.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

fn month_start(year: i32, month: u32) -> NaiveDate {
    // Both arguments always come from a valid date's year/month fields.
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid year-month")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The `months` trailing calendar-month windows ending with the month
/// containing `today`, ordered oldest first.
pub fn trailing_month_windows(today: NaiveDate, months: u32) -> Vec<MonthWindow> {
    let mut year = today.year();
    let mut month = today.month();
    let mut windows = Vec::with_capacity(months as usize);
    for _ in 0..months {
        let (ny, nm) = next_month(year, month);
        windows.push(MonthWindow {
            year,
            month,
            start: month_start(year, month),
            end: month_start(ny, nm),
        });
        let (py, pm) = prev_month(year, month);
        year = py;
        month = pm;
    }
    windows.reverse();
    windows
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Direction of the month-over-month trend, comparing the last two buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Compare the last two counts in a series. Fewer than two buckets is
    /// a flat series.
    pub fn from_series(counts: &[i64]) -> Self {
        match counts {
            [.., second_last, last] => {
                if last > second_last {
                    Self::Up
                } else if last < second_last {
                    Self::Down
                } else {
                    Self::Stable
                }
            }
            _ => Self::Stable,
        }
    }
}

/// One bucket in the monthly-trend series.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MonthBucket {
    /// `YYYY-MM` label.
    pub month: String,
    pub count: i64,
    /// Series-wide trend, attached uniformly to every bucket.
    pub trend: TrendDirection,
}

/// Zip windows with their counts into the output series.
///
/// The single trend value derived from the last two counts is repeated on
/// every bucket; it is a property of the series, not of one bucket.
pub fn build_trend_series(windows: &[MonthWindow], counts: &[i64]) -> Vec<MonthBucket> {
    debug_assert_eq!(windows.len(), counts.len());
    let trend = TrendDirection::from_series(counts);
    windows
        .iter()
        .zip(counts)
        .map(|(w, &count)| MonthBucket {
            month: w.label(),
            count,
            trend,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category shares
// ---------------------------------------------------------------------------

/// One maintenance-type share within a bounded sample.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub count: i64,
    /// Percentage of the sample, rounded to the nearest whole number.
    pub percentage: i64,
}

/// Category breakdown over a bounded sample of recent events.
///
/// `sample_size` is part of the contract: the percentages are an estimate
/// over the most recent `sample_size` events, not the full ledger.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryShare>,
    pub sample_size: i64,
}

/// Group `(name, count)` pairs into shares. An empty sample is a valid
/// empty breakdown, never an error.
pub fn category_breakdown(counts: Vec<(String, i64)>) -> CategoryBreakdown {
    let total: i64 = counts.iter().map(|(_, c)| c).sum();
    let categories = counts
        .into_iter()
        .map(|(name, count)| CategoryShare {
            percentage: if total == 0 {
                0
            } else {
                (count as f64 / total as f64 * 100.0).round() as i64
            },
            name,
            count,
        })
        .collect();
    CategoryBreakdown {
        categories,
        sample_size: total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- Month windows --------------------------------------------------------

    #[test]
    fn six_trailing_windows_end_with_current_month() {
        let windows = trailing_month_windows(date(2026, 8, 28), 6);
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[0].label(), "2026-03");
        assert_eq!(windows[5].label(), "2026-08");
        assert_eq!(windows[5].start, date(2026, 8, 1));
        assert_eq!(windows[5].end, date(2026, 9, 1));
    }

    #[test]
    fn windows_cross_year_boundary() {
        let windows = trailing_month_windows(date(2026, 2, 14), 4);
        let labels: Vec<String> = windows.iter().map(|w| w.label()).collect();
        assert_eq!(labels, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
        assert_eq!(windows[1].end, date(2026, 1, 1));
    }

    #[test]
    fn windows_are_contiguous() {
        let windows = trailing_month_windows(date(2026, 8, 28), 6);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn single_window() {
        let windows = trailing_month_windows(date(2026, 8, 1), 1);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].label(), "2026-08");
    }

    // -- Trend ----------------------------------------------------------------

    #[test]
    fn trend_up() {
        assert_eq!(TrendDirection::from_series(&[1, 2, 5]), TrendDirection::Up);
    }

    #[test]
    fn trend_down() {
        assert_eq!(TrendDirection::from_series(&[9, 4]), TrendDirection::Down);
    }

    #[test]
    fn trend_stable() {
        assert_eq!(TrendDirection::from_series(&[3, 3]), TrendDirection::Stable);
    }

    #[test]
    fn trend_of_short_series_is_stable() {
        assert_eq!(TrendDirection::from_series(&[7]), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_series(&[]), TrendDirection::Stable);
    }

    #[test]
    fn trend_is_attached_to_every_bucket() {
        let windows = trailing_month_windows(date(2026, 8, 28), 3);
        let series = build_trend_series(&windows, &[2, 1, 4]);
        assert_eq!(series.len(), 3);
        for bucket in &series {
            assert_eq!(bucket.trend, TrendDirection::Up);
        }
        assert_eq!(series[2].count, 4);
        assert_eq!(series[0].month, "2026-06");
    }

    #[test]
    fn zero_count_buckets_are_valid() {
        let windows = trailing_month_windows(date(2026, 8, 28), 2);
        let series = build_trend_series(&windows, &[0, 0]);
        assert_eq!(series[0].count, 0);
        assert_eq!(series[0].trend, TrendDirection::Stable);
    }

    // -- Category shares ------------------------------------------------------

    #[test]
    fn percentages_are_rounded() {
        let breakdown = category_breakdown(vec![
            ("sharpen".into(), 2),
            ("weld".into(), 1),
        ]);
        assert_eq!(breakdown.sample_size, 3);
        assert_eq!(breakdown.categories[0].percentage, 67);
        assert_eq!(breakdown.categories[1].percentage, 33);
    }

    #[test]
    fn empty_sample_is_empty_breakdown() {
        let breakdown = category_breakdown(vec![]);
        assert!(breakdown.categories.is_empty());
        assert_eq!(breakdown.sample_size, 0);
    }

    #[test]
    fn single_category_is_hundred_percent() {
        let breakdown = category_breakdown(vec![("sharpen".into(), 42)]);
        assert_eq!(breakdown.categories[0].percentage, 100);
        assert_eq!(breakdown.sample_size, 42);
    }
}

//! Due-date estimation and urgency classification.
//!
//! Pure calculation over an asset's latest closed maintenance event; the
//! API layer is responsible for loading the history and feeding it in.
//! Assets with no closed event have no estimate at all. They are excluded,
//! not defaulted.

use chrono::{Duration, NaiveDate};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of days between services. Overridable via configuration.
pub const DEFAULT_SERVICE_INTERVAL_DAYS: i64 = 30;

/// Upper bound (inclusive) of the HIGH band in days remaining.
pub const HIGH_MAX_DAYS: i64 = 3;

/// Upper bound (inclusive) of the MEDIUM band in days remaining.
pub const MEDIUM_MAX_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// Coarse classification of how soon (or overdue) the next service is.
///
/// Variant order is severity order; `Critical` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Classify a signed days-remaining value. Bands have inclusive lower
    /// bounds: negative is overdue, 0-3 HIGH, 4-7 MEDIUM, above that LOW.
    pub fn from_days_remaining(days: i64) -> Self {
        if days < 0 {
            Self::Critical
        } else if days <= HIGH_MAX_DAYS {
            Self::High
        } else if days <= MEDIUM_MAX_DAYS {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Estimates
// ---------------------------------------------------------------------------

/// Predicted next service for one asset.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DueEstimate {
    pub asset_id: DbId,
    pub asset_code: String,
    pub branch_id: DbId,
    /// Date of the latest closed maintenance event.
    pub last_serviced: NaiveDate,
    pub due_date: NaiveDate,
    /// Whole days until `due_date`; negative when overdue.
    pub days_remaining: i64,
    pub urgency: Urgency,
}

/// Compute the predicted due date from the latest close timestamp.
pub fn due_date(last_closed: Timestamp, interval_days: i64) -> NaiveDate {
    last_closed.date_naive() + Duration::days(interval_days)
}

/// Whole-day difference `due - today`; negative when the due date passed.
pub fn days_remaining(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Build the estimate for a single asset from its latest closed event.
pub fn estimate(
    asset_id: DbId,
    asset_code: String,
    branch_id: DbId,
    last_closed: Timestamp,
    interval_days: i64,
    today: NaiveDate,
) -> DueEstimate {
    let due = due_date(last_closed, interval_days);
    let remaining = days_remaining(due, today);
    DueEstimate {
        asset_id,
        asset_code,
        branch_id,
        last_serviced: last_closed.date_naive(),
        due_date: due,
        days_remaining: remaining,
        urgency: Urgency::from_days_remaining(remaining),
    }
}

/// Sort estimates by urgency severity, then days remaining ascending.
///
/// Uses a stable sort; ties on both keys keep their input order.
pub fn sort_estimates(estimates: &mut [DueEstimate]) {
    estimates.sort_by_key(|e| (e.urgency, e.days_remaining));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- Urgency bands --------------------------------------------------------

    #[test]
    fn negative_days_is_critical() {
        assert_eq!(Urgency::from_days_remaining(-1), Urgency::Critical);
        assert_eq!(Urgency::from_days_remaining(-365), Urgency::Critical);
    }

    #[test]
    fn zero_days_is_high() {
        assert_eq!(Urgency::from_days_remaining(0), Urgency::High);
    }

    #[test]
    fn three_days_is_high() {
        assert_eq!(Urgency::from_days_remaining(3), Urgency::High);
    }

    #[test]
    fn four_days_is_medium() {
        assert_eq!(Urgency::from_days_remaining(4), Urgency::Medium);
    }

    #[test]
    fn seven_days_is_medium() {
        assert_eq!(Urgency::from_days_remaining(7), Urgency::Medium);
    }

    #[test]
    fn eight_days_is_low() {
        assert_eq!(Urgency::from_days_remaining(8), Urgency::Low);
    }

    #[test]
    fn severity_ordering() {
        assert!(Urgency::Critical < Urgency::High);
        assert!(Urgency::High < Urgency::Medium);
        assert!(Urgency::Medium < Urgency::Low);
    }

    // -- Due date math --------------------------------------------------------

    #[test]
    fn due_date_adds_interval() {
        let closed = Utc.with_ymd_and_hms(2026, 1, 10, 14, 30, 0).unwrap();
        assert_eq!(due_date(closed, 30), date(2026, 2, 9));
    }

    #[test]
    fn days_remaining_may_be_negative() {
        assert_eq!(days_remaining(date(2026, 1, 5), date(2026, 1, 10)), -5);
        assert_eq!(days_remaining(date(2026, 1, 10), date(2026, 1, 10)), 0);
        assert_eq!(days_remaining(date(2026, 1, 17), date(2026, 1, 10)), 7);
    }

    #[test]
    fn thirty_five_days_ago_with_default_interval_is_critical() {
        let today = date(2026, 3, 10);
        let closed = Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap(); // 35 days ago
        let est = estimate(7, "SAW-007".into(), 1, closed, DEFAULT_SERVICE_INTERVAL_DAYS, today);
        assert_eq!(est.days_remaining, -5);
        assert_eq!(est.urgency, Urgency::Critical);
    }

    // -- Sorting --------------------------------------------------------------

    fn est(id: DbId, days: i64) -> DueEstimate {
        DueEstimate {
            asset_id: id,
            asset_code: format!("A-{id}"),
            branch_id: 1,
            last_serviced: date(2026, 1, 1),
            due_date: date(2026, 1, 1),
            days_remaining: days,
            urgency: Urgency::from_days_remaining(days),
        }
    }

    #[test]
    fn sort_orders_by_urgency_then_days() {
        let mut v = vec![est(1, 10), est(2, -3), est(3, 2), est(4, 5), est(5, -1)];
        sort_estimates(&mut v);
        let ids: Vec<DbId> = v.iter().map(|e| e.asset_id).collect();
        assert_eq!(ids, vec![2, 5, 3, 4, 1]);
    }

    #[test]
    fn sort_is_stable_on_full_ties() {
        let mut v = vec![est(10, 2), est(11, 2), est(12, 2)];
        sort_estimates(&mut v);
        let ids: Vec<DbId> = v.iter().map(|e| e.asset_id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }
}

//! Dashboard aggregation endpoints.
//!
//! Monthly counts come from server-side COUNT queries scoped per bucket,
//! never from fetching rows and grouping in-process; the bucket counts
//! stay exact however large the ledger grows. The category breakdown is
//! explicitly sample-based and says so via `sample_size`.
//!
//! Dashboard responses may be served from the TTL cache; the report
//! endpoints reuse the same computations uncached.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use sharptrack_core::aggregation::{self, CategoryBreakdown, MonthBucket};
use sharptrack_core::error::CoreError;
use sharptrack_core::types::DbId;
use sharptrack_db::models::maintenance_event::EventFilter;
use sharptrack_db::paging::read_events;
use sharptrack_db::repositories::{LookupRepo, MaintenanceEventRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub branch_id: Option<DbId>,
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub branch_id: Option<DbId>,
    pub sample_ceiling: Option<usize>,
}

// ---------------------------------------------------------------------------
// Shared computations (also used by the uncached report endpoints)
// ---------------------------------------------------------------------------

/// Count events per trailing calendar-month bucket and attach the trend.
///
/// Bucket counts are independent reads with no ordering dependency, so
/// they are issued concurrently.
pub(crate) async fn compute_monthly_trend(
    pool: &PgPool,
    branch_id: Option<DbId>,
    months: u32,
    today: NaiveDate,
) -> AppResult<Vec<MonthBucket>> {
    let windows = aggregation::trailing_month_windows(today, months);
    let counts: Vec<i64> = try_join_all(windows.iter().map(|w| {
        let filter = EventFilter::opened_between(
            branch_id,
            w.start.and_time(NaiveTime::MIN).and_utc(),
            w.end.and_time(NaiveTime::MIN).and_utc(),
        );
        let pool = pool.clone();
        async move { MaintenanceEventRepo::count(&pool, &filter).await }
    }))
    .await?;
    Ok(aggregation::build_trend_series(&windows, &counts))
}

/// Group a bounded sample of the most recent events by maintenance type.
pub(crate) async fn compute_category_breakdown(
    pool: &PgPool,
    branch_id: Option<DbId>,
    sample_ceiling: usize,
) -> AppResult<CategoryBreakdown> {
    let filter = EventFilter {
        branch_id,
        ..EventFilter::default()
    };
    let sample = read_events(pool, filter, sample_ceiling).await?;

    let mut by_type: HashMap<DbId, i64> = HashMap::new();
    for event in &sample {
        *by_type.entry(event.maintenance_type_id).or_insert(0) += 1;
    }

    let ids: Vec<DbId> = by_type.keys().copied().collect();
    let names: HashMap<DbId, String> = LookupRepo::maintenance_types_by_ids(pool, &ids)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let mut pairs: Vec<(String, i64)> = by_type
        .into_iter()
        .map(|(id, count)| {
            let name = names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| format!("type {id}"));
            (name, count)
        })
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(aggregation::category_breakdown(pairs))
}

pub(crate) fn validate_months(months: u32) -> AppResult<()> {
    if months == 0 || months > 60 {
        return Err(CoreError::Validation(format!(
            "months must be between 1 and 60, got {months}"
        ))
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /dashboard/monthly-trend?branch_id=&months=` — cached.
pub async fn monthly_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> AppResult<impl IntoResponse> {
    let months = query.months.unwrap_or(state.config.trend_months);
    validate_months(months)?;

    let key = (query.branch_id, months);
    if let Some(series) = state.dashboard_cache.trend.get(&key).await {
        return Ok(Json(DataResponse { data: series }));
    }

    let series =
        compute_monthly_trend(&state.pool, query.branch_id, months, Utc::now().date_naive())
            .await?;
    state.dashboard_cache.trend.insert(key, series.clone()).await;
    Ok(Json(DataResponse { data: series }))
}

/// `GET /dashboard/category-breakdown?branch_id=&sample_ceiling=` — cached.
pub async fn category_breakdown(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<impl IntoResponse> {
    let ceiling = query.sample_ceiling.unwrap_or(state.config.sample_ceiling);

    let key = (query.branch_id, ceiling);
    if let Some(breakdown) = state.dashboard_cache.categories.get(&key).await {
        return Ok(Json(DataResponse { data: breakdown }));
    }

    let breakdown = compute_category_breakdown(&state.pool, query.branch_id, ceiling).await?;
    state
        .dashboard_cache
        .categories
        .insert(key, breakdown.clone())
        .await;
    Ok(Json(DataResponse { data: breakdown }))
}

/// `POST /dashboard/cache/invalidate` — drop all cached aggregates.
pub async fn invalidate_cache(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.dashboard_cache.invalidate_all().await;
    Ok(Json(DataResponse {
        data: json!({ "invalidated": true }),
    }))
}

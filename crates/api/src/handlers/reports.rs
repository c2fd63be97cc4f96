//! Report/export aggregation endpoints.
//!
//! Same payloads as the dashboard endpoints but recomputed from the live
//! ledger on every request. An export must reflect the ledger as of the
//! request, so the advisory cache is never consulted here.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::error::AppResult;
use crate::handlers::dashboard::{
    compute_category_breakdown, compute_monthly_trend, validate_months, CategoryQuery, TrendQuery,
};
use crate::response::DataResponse;
use crate::state::AppState;

/// `GET /reports/monthly-trend?branch_id=&months=` — always fresh.
pub async fn monthly_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> AppResult<impl IntoResponse> {
    let months = query.months.unwrap_or(state.config.trend_months);
    validate_months(months)?;
    let series =
        compute_monthly_trend(&state.pool, query.branch_id, months, Utc::now().date_naive())
            .await?;
    Ok(Json(DataResponse { data: series }))
}

/// `GET /reports/category-breakdown?branch_id=&sample_ceiling=` — always fresh.
pub async fn category_breakdown(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<impl IntoResponse> {
    let ceiling = query.sample_ceiling.unwrap_or(state.config.sample_ceiling);
    let breakdown = compute_category_breakdown(&state.pool, query.branch_id, ceiling).await?;
    Ok(Json(DataResponse { data: breakdown }))
}

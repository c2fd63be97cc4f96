//! Scheduling estimator endpoint.
//!
//! Orchestration only: load candidate assets, pull each one's latest
//! closed event through the bulk reader, and delegate the date math and
//! classification to `sharptrack_core::schedule`.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use sharptrack_core::lifecycle::AssetState;
use sharptrack_core::schedule::{self, DueEstimate};
use sharptrack_db::models::maintenance_event::EventFilter;
use sharptrack_db::paging::read_events;
use sharptrack_db::repositories::AssetRepo;

use crate::error::AppResult;
use crate::handlers::assets::BranchQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// `GET /schedule/upcoming?branch_id=` — due estimates for active assets,
/// ordered by urgency severity then days remaining.
///
/// Assets with no closed maintenance history are omitted: with nothing to
/// extrapolate from there is no estimate, and that is not an error.
pub async fn upcoming_maintenance(
    State(state): State<AppState>,
    Query(query): Query<BranchQuery>,
) -> AppResult<impl IntoResponse> {
    let candidates = AssetRepo::list_active_in_states(
        &state.pool,
        query.branch_id,
        &[AssetState::Available, AssetState::InMaintenance],
    )
    .await?;

    let today = Utc::now().date_naive();
    let interval = state.config.service_interval_days;

    let mut estimates: Vec<DueEstimate> = Vec::new();
    for asset in candidates {
        // Most recently closed event first; one record is all the
        // estimator needs.
        let history = read_events(&state.pool, EventFilter::closed_history(asset.id), 1).await?;
        let Some(last_closed) = history.first().and_then(|e| e.date_closed) else {
            continue;
        };
        estimates.push(schedule::estimate(
            asset.id,
            asset.code,
            asset.branch_id,
            last_closed,
            interval,
            today,
        ));
    }

    schedule::sort_estimates(&mut estimates);
    Ok(Json(DataResponse { data: estimates }))
}

//! Lifecycle operation endpoints: open, close, notes, return to service.
//!
//! Thin wrappers over `LifecycleRepo`; every state rule lives in the
//! repository transaction, so these handlers only shape input and output.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use sharptrack_core::types::DbId;
use sharptrack_db::models::asset::Asset;
use sharptrack_db::models::maintenance_event::{
    CloseMaintenance, MaintenanceEvent, OpenMaintenance,
};
use sharptrack_db::repositories::LifecycleRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a lifecycle operation: the updated asset and the event it
/// touched.
#[derive(Debug, Serialize)]
pub struct MaintenanceOutcome {
    pub asset: Asset,
    pub event: MaintenanceEvent,
}

/// `POST /maintenance` — open a maintenance event.
pub async fn open_maintenance(
    State(state): State<AppState>,
    Json(body): Json<OpenMaintenance>,
) -> AppResult<impl IntoResponse> {
    let (asset, event) = LifecycleRepo::open_maintenance(&state.pool, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MaintenanceOutcome { asset, event },
        }),
    ))
}

/// `POST /maintenance/{id}/close` — close an open event.
pub async fn close_maintenance(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(body): Json<CloseMaintenance>,
) -> AppResult<impl IntoResponse> {
    let (asset, event) = LifecycleRepo::close_maintenance(&state.pool, event_id, &body).await?;
    Ok(Json(DataResponse {
        data: MaintenanceOutcome { asset, event },
    }))
}

/// Payload for appending notes to an event.
#[derive(Debug, Deserialize)]
pub struct AppendNotes {
    pub notes: String,
}

/// `POST /maintenance/{id}/notes` — append to an event's notes.
pub async fn append_notes(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(body): Json<AppendNotes>,
) -> AppResult<impl IntoResponse> {
    let event = LifecycleRepo::append_notes(&state.pool, event_id, &body.notes).await?;
    Ok(Json(DataResponse { data: event }))
}

/// `POST /assets/{id}/return` — pickup confirmation.
pub async fn return_to_service(
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = LifecycleRepo::return_to_service(&state.pool, asset_id).await?;
    Ok(Json(DataResponse { data: asset }))
}

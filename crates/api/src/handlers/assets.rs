//! Asset registry endpoints: registration and reads.
//!
//! State mutations go through the maintenance handlers; the registry
//! itself only creates (AVAILABLE) and lists.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use sharptrack_core::error::CoreError;
use sharptrack_core::types::DbId;
use sharptrack_db::models::asset::CreateAsset;
use sharptrack_db::repositories::AssetRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Branch scoping for list endpoints.
#[derive(Debug, Deserialize)]
pub struct BranchQuery {
    pub branch_id: Option<DbId>,
}

/// `POST /assets` — register a new asset, created AVAILABLE.
pub async fn create_asset(
    State(state): State<AppState>,
    Json(body): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    if body.code.trim().is_empty() {
        return Err(CoreError::Validation("Asset code must not be empty".to_string()).into());
    }
    let asset = AssetRepo::create(&state.pool, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// `GET /assets/{id}`.
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "asset", id })?;
    Ok(Json(DataResponse { data: asset }))
}

/// `GET /assets?branch_id=` — list assets, optionally branch-scoped.
pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<BranchQuery>,
) -> AppResult<impl IntoResponse> {
    let assets = AssetRepo::list(&state.pool, query.branch_id).await?;
    Ok(Json(DataResponse { data: assets }))
}

//! Asset registry models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sharptrack_core::error::CoreError;
use sharptrack_core::lifecycle::AssetState;
use sharptrack_core::types::{DbId, Timestamp};

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    /// Human-readable code; unique and immutable once assigned.
    pub code: String,
    pub asset_type_id: DbId,
    pub branch_id: DbId,
    /// One-way flag; `false` implies the lifecycle state is terminal.
    pub active: bool,
    pub state: String,
    pub registered_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    /// Decode the stored state string into the lifecycle enum.
    pub fn lifecycle_state(&self) -> Result<AssetState, CoreError> {
        AssetState::from_str_value(&self.state)
    }
}

/// DTO for registering a new asset. Assets are created AVAILABLE.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub code: String,
    pub asset_type_id: DbId,
    pub branch_id: DbId,
}

//! Simple reference entities. No lifecycle; queried for FK validation and
//! display names only.

use serde::Serialize;
use sqlx::FromRow;

use sharptrack_core::types::{DbId, Timestamp};

/// A row from the `maintenance_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceType {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

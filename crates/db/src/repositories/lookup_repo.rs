//! Reads against the simple reference tables.

use sqlx::PgPool;

use sharptrack_core::types::DbId;

use crate::models::lookup::MaintenanceType;

/// Read access to reference entities.
pub struct LookupRepo;

impl LookupRepo {
    /// Resolve maintenance types by ID, for attaching display names to
    /// aggregation output.
    pub async fn maintenance_types_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<MaintenanceType>, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceType>(
            "SELECT id, name, created_at FROM maintenance_types WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}

//! Repository for the asset registry.
//!
//! State mutations are not exposed here; they belong exclusively to
//! [`crate::repositories::LifecycleRepo`].

use sqlx::PgPool;

use sharptrack_core::lifecycle::AssetState;
use sharptrack_core::types::DbId;

use crate::models::asset::{Asset, CreateAsset};

/// Column list for `assets` queries.
pub(crate) const ASSET_COLUMNS: &str =
    "id, code, asset_type_id, branch_id, active, state, registered_at, created_at, updated_at";

/// Read access and registration for trackable assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Register a new asset. Assets are created active and AVAILABLE.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (code, asset_type_id, branch_id) \
             VALUES ($1, $2, $3) \
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.code)
            .bind(input.asset_type_id)
            .bind(input.branch_id)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assets, optionally scoped to one branch, ordered by code.
    pub async fn list(pool: &PgPool, branch_id: Option<DbId>) -> Result<Vec<Asset>, sqlx::Error> {
        let query = match branch_id {
            Some(_) => format!(
                "SELECT {ASSET_COLUMNS} FROM assets WHERE branch_id = $1 ORDER BY code"
            ),
            None => format!("SELECT {ASSET_COLUMNS} FROM assets ORDER BY code"),
        };
        let mut q = sqlx::query_as::<_, Asset>(&query);
        if let Some(id) = branch_id {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }

    /// List active assets currently in one of the given lifecycle states,
    /// optionally scoped to a branch. Ordered by code for deterministic
    /// downstream processing.
    pub async fn list_active_in_states(
        pool: &PgPool,
        branch_id: Option<DbId>,
        states: &[AssetState],
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let state_strings: Vec<String> =
            states.iter().map(|s| s.as_str().to_string()).collect();
        let query = match branch_id {
            Some(_) => format!(
                "SELECT {ASSET_COLUMNS} FROM assets \
                 WHERE active AND state = ANY($1) AND branch_id = $2 \
                 ORDER BY code"
            ),
            None => format!(
                "SELECT {ASSET_COLUMNS} FROM assets \
                 WHERE active AND state = ANY($1) \
                 ORDER BY code"
            ),
        };
        let mut q = sqlx::query_as::<_, Asset>(&query).bind(state_strings);
        if let Some(id) = branch_id {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }
}

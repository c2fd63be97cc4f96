//! The lifecycle state machine's write path.
//!
//! Every operation runs as one transaction with a `SELECT ... FOR UPDATE`
//! row lock on the asset, so two concurrent writers for the same asset are
//! serialized: the loser re-reads committed state and gets a `Conflict`
//! instead of a double-apply. The partial unique index on open events is a
//! second, database-level backstop for the same invariant.
//!
//! These methods return [`CoreError`] directly because state checks are
//! part of their contract; store failures map to `CoreError::DataAccess`.

use sqlx::{PgPool, Postgres, Transaction};

use sharptrack_core::error::CoreError;
use sharptrack_core::lifecycle::{self, AssetState};
use sharptrack_core::types::DbId;

use crate::models::asset::Asset;
use crate::models::maintenance_event::{CloseMaintenance, MaintenanceEvent, OpenMaintenance};
use crate::repositories::asset_repo::ASSET_COLUMNS;

/// Column list for `maintenance_events` writes (unaliased).
const EVENT_COLUMNS: &str = "\
    id, asset_id, maintenance_type_id, performed_by, \
    date_opened, date_closed, notes, is_final, created_at";

fn data_access(err: sqlx::Error) -> CoreError {
    CoreError::DataAccess(err.to_string())
}

/// Map an insert failure, turning a violation of the one-open-event index
/// into the `Conflict` it actually is.
fn map_event_insert_err(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some("uq_maintenance_events_open_asset")
        {
            return CoreError::Conflict(
                "Asset already has an open maintenance event".to_string(),
            );
        }
    }
    data_access(err)
}

/// Lock and load an asset row inside a transaction.
async fn lock_asset(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
) -> Result<Asset, CoreError> {
    let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Asset>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(data_access)?
        .ok_or(CoreError::NotFound {
            entity: "asset",
            id,
        })
}

/// Apply a validated state transition to a locked asset row. A final
/// deactivation also drops the one-way `active` flag.
async fn apply_transition(
    tx: &mut Transaction<'_, Postgres>,
    asset_id: DbId,
    to: AssetState,
) -> Result<Asset, CoreError> {
    let query = if to == AssetState::Deactivated {
        format!(
            "UPDATE assets SET state = $2, active = false, updated_at = now() \
             WHERE id = $1 RETURNING {ASSET_COLUMNS}"
        )
    } else {
        format!(
            "UPDATE assets SET state = $2, updated_at = now() \
             WHERE id = $1 RETURNING {ASSET_COLUMNS}"
        )
    };
    sqlx::query_as::<_, Asset>(&query)
        .bind(asset_id)
        .bind(to.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(data_access)
}

async fn reference_exists(
    tx: &mut Transaction<'_, Postgres>,
    table: &'static str,
    id: DbId,
) -> Result<bool, CoreError> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)");
    sqlx::query_scalar::<_, bool>(&query)
        .bind(id)
        .fetch_one(&mut **tx)
        .await
        .map_err(data_access)
}

/// Transactional lifecycle operations. The only component that writes the
/// ledger or mutates asset state.
pub struct LifecycleRepo;

impl LifecycleRepo {
    /// Open a maintenance event for an AVAILABLE asset and move it to
    /// IN_MAINTENANCE. Event creation and state transition commit or roll
    /// back together.
    pub async fn open_maintenance(
        pool: &PgPool,
        input: &OpenMaintenance,
    ) -> Result<(Asset, MaintenanceEvent), CoreError> {
        let mut tx = pool.begin().await.map_err(data_access)?;

        let asset = lock_asset(&mut tx, input.asset_id).await?;
        if !asset.active {
            return Err(CoreError::Conflict(format!(
                "Asset {} is deactivated",
                asset.code
            )));
        }
        let state = asset.lifecycle_state()?;
        lifecycle::validate_transition(state, AssetState::InMaintenance)?;

        // The state check should make this impossible; re-check anyway so a
        // drifted registry row cannot break the one-open-event invariant.
        let open_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM maintenance_events \
             WHERE asset_id = $1 AND date_closed IS NULL)",
        )
        .bind(input.asset_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(data_access)?;
        if open_exists {
            return Err(CoreError::Conflict(format!(
                "Asset {} already has an open maintenance event",
                asset.code
            )));
        }

        if !reference_exists(&mut tx, "maintenance_types", input.maintenance_type_id).await? {
            return Err(CoreError::Validation(format!(
                "Unknown maintenance type: {}",
                input.maintenance_type_id
            )));
        }
        if !reference_exists(&mut tx, "users", input.performed_by).await? {
            return Err(CoreError::Validation(format!(
                "Unknown performer: {}",
                input.performed_by
            )));
        }

        let insert = format!(
            "INSERT INTO maintenance_events \
                (asset_id, maintenance_type_id, performed_by, date_opened) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, MaintenanceEvent>(&insert)
            .bind(input.asset_id)
            .bind(input.maintenance_type_id)
            .bind(input.performed_by)
            .bind(input.date_opened)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_event_insert_err)?;

        let asset = apply_transition(&mut tx, input.asset_id, AssetState::InMaintenance).await?;

        tx.commit().await.map_err(data_access)?;
        tracing::info!(
            asset_id = asset.id,
            event_id = event.id,
            "Opened maintenance event"
        );
        Ok((asset, event))
    }

    /// Close an open maintenance event. The asset moves to
    /// READY_FOR_PICKUP, or straight to DEACTIVATED on a final close.
    pub async fn close_maintenance(
        pool: &PgPool,
        event_id: DbId,
        input: &CloseMaintenance,
    ) -> Result<(Asset, MaintenanceEvent), CoreError> {
        let mut tx = pool.begin().await.map_err(data_access)?;

        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM maintenance_events WHERE id = $1 FOR UPDATE"
        );
        let event = sqlx::query_as::<_, MaintenanceEvent>(&query)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(data_access)?
            .ok_or(CoreError::NotFound {
                entity: "maintenance_event",
                id: event_id,
            })?;

        if !event.is_open() {
            return Err(CoreError::Conflict(format!(
                "Maintenance event {event_id} is already closed"
            )));
        }
        if input.date_closed < event.date_opened {
            return Err(CoreError::Validation(
                "Close date precedes the open date".to_string(),
            ));
        }

        let asset = lock_asset(&mut tx, event.asset_id).await?;
        let target = lifecycle::close_target(input.is_final);
        lifecycle::validate_transition(asset.lifecycle_state()?, target)?;

        let update = format!(
            "UPDATE maintenance_events \
             SET date_closed = $2, is_final = $3, notes = COALESCE($4, notes) \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, MaintenanceEvent>(&update)
            .bind(event_id)
            .bind(input.date_closed)
            .bind(input.is_final)
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(data_access)?;

        let asset = apply_transition(&mut tx, event.asset_id, target).await?;

        tx.commit().await.map_err(data_access)?;
        tracing::info!(
            asset_id = asset.id,
            event_id = event.id,
            is_final = event.is_final,
            "Closed maintenance event"
        );
        Ok((asset, event))
    }

    /// Confirm pickup: READY_FOR_PICKUP back to AVAILABLE.
    pub async fn return_to_service(pool: &PgPool, asset_id: DbId) -> Result<Asset, CoreError> {
        let mut tx = pool.begin().await.map_err(data_access)?;

        let asset = lock_asset(&mut tx, asset_id).await?;
        lifecycle::validate_transition(asset.lifecycle_state()?, AssetState::Available)?;

        let asset = apply_transition(&mut tx, asset_id, AssetState::Available).await?;

        tx.commit().await.map_err(data_access)?;
        tracing::info!(asset_id = asset.id, "Asset returned to service");
        Ok(asset)
    }

    /// Append to an event's notes. The only mutation a closed event admits.
    pub async fn append_notes(
        pool: &PgPool,
        event_id: DbId,
        notes: &str,
    ) -> Result<MaintenanceEvent, CoreError> {
        if notes.trim().is_empty() {
            return Err(CoreError::Validation("Notes must not be empty".to_string()));
        }
        let query = format!(
            "UPDATE maintenance_events \
             SET notes = CASE \
                 WHEN notes IS NULL OR notes = '' THEN $2 \
                 ELSE notes || E'\\n' || $2 \
             END \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceEvent>(&query)
            .bind(event_id)
            .bind(notes)
            .fetch_optional(pool)
            .await
            .map_err(data_access)?
            .ok_or(CoreError::NotFound {
                entity: "maintenance_event",
                id: event_id,
            })
    }
}

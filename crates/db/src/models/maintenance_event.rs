//! Maintenance ledger models, DTOs, and the query descriptor consumed by
//! the paginated bulk reader.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sharptrack_core::types::{DbId, Timestamp};

/// A row from the `maintenance_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceEvent {
    pub id: DbId,
    pub asset_id: DbId,
    pub maintenance_type_id: DbId,
    pub performed_by: DbId,
    pub date_opened: Timestamp,
    pub date_closed: Option<Timestamp>,
    pub notes: Option<String>,
    /// Marks that no further maintenance will ever be performed on the
    /// asset. Only set on close.
    pub is_final: bool,
    pub created_at: Timestamp,
}

impl MaintenanceEvent {
    pub fn is_open(&self) -> bool {
        self.date_closed.is_none()
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for opening a maintenance event.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMaintenance {
    pub asset_id: DbId,
    pub maintenance_type_id: DbId,
    pub performed_by: DbId,
    pub date_opened: Timestamp,
}

/// DTO for closing a maintenance event.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseMaintenance {
    pub date_closed: Timestamp,
    pub notes: Option<String>,
    /// When true the asset is retired: it goes straight to DEACTIVATED,
    /// never through READY_FOR_PICKUP.
    #[serde(default)]
    pub is_final: bool,
}

// ---------------------------------------------------------------------------
// Query descriptor
// ---------------------------------------------------------------------------

/// Open/closed filter for ledger queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Open,
    Closed,
    #[default]
    Any,
}

/// Requested ordering for ledger queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrder {
    /// Newest opened first.
    #[default]
    DateOpenedDesc,
    /// Most recently closed first. Pairs with `EventStatus::Closed`.
    DateClosedDesc,
}

/// Declarative description of one ledger query. Consumed by
/// `MaintenanceEventRepo::fetch_page`/`count` and, through the page
/// fetcher, by the bulk reader.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub asset_id: Option<DbId>,
    /// Scopes by branch via the asset join.
    pub branch_id: Option<DbId>,
    /// Inclusive lower bound on `date_opened`.
    pub opened_from: Option<Timestamp>,
    /// Exclusive upper bound on `date_opened`.
    pub opened_before: Option<Timestamp>,
    pub status: EventStatus,
    pub order: EventOrder,
}

impl EventFilter {
    /// Closed history of one asset, most recently closed first. The shape
    /// the scheduling estimator reads.
    pub fn closed_history(asset_id: DbId) -> Self {
        Self {
            asset_id: Some(asset_id),
            status: EventStatus::Closed,
            order: EventOrder::DateClosedDesc,
            ..Self::default()
        }
    }

    /// Events opened within `[from, before)`, optionally branch-scoped.
    pub fn opened_between(
        branch_id: Option<DbId>,
        from: Timestamp,
        before: Timestamp,
    ) -> Self {
        Self {
            branch_id,
            opened_from: Some(from),
            opened_before: Some(before),
            ..Self::default()
        }
    }
}

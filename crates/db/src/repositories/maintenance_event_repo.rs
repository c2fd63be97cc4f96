//! Read access to the maintenance ledger.
//!
//! Every read is described by an [`EventFilter`] so the same descriptor
//! drives paged row fetches (through the bulk reader) and server-side
//! count queries. Writes happen only inside
//! [`crate::repositories::LifecycleRepo`] transactions.

use sqlx::PgPool;

use sharptrack_core::types::DbId;

use crate::models::maintenance_event::{
    EventFilter, EventOrder, EventStatus, MaintenanceEvent,
};

/// Column list for `maintenance_events` queries (joined alias `e`).
const EVENT_COLUMNS: &str = "\
    e.id, e.asset_id, e.maintenance_type_id, e.performed_by, \
    e.date_opened, e.date_closed, e.notes, e.is_final, e.created_at";

/// Build the WHERE clause for a filter, starting placeholders at
/// `$first_idx`. Returns the clause and the next free placeholder index.
fn build_where(filter: &EventFilter, first_idx: u32) -> (String, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut idx = first_idx;

    if filter.asset_id.is_some() {
        conditions.push(format!("e.asset_id = ${idx}"));
        idx += 1;
    }
    if filter.branch_id.is_some() {
        conditions.push(format!("a.branch_id = ${idx}"));
        idx += 1;
    }
    if filter.opened_from.is_some() {
        conditions.push(format!("e.date_opened >= ${idx}"));
        idx += 1;
    }
    if filter.opened_before.is_some() {
        conditions.push(format!("e.date_opened < ${idx}"));
        idx += 1;
    }
    match filter.status {
        EventStatus::Open => conditions.push("e.date_closed IS NULL".to_string()),
        EventStatus::Closed => conditions.push("e.date_closed IS NOT NULL".to_string()),
        EventStatus::Any => {}
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, idx)
}

fn order_clause(order: EventOrder) -> &'static str {
    // Secondary id key makes offset pagination deterministic.
    match order {
        EventOrder::DateOpenedDesc => "ORDER BY e.date_opened DESC, e.id DESC",
        EventOrder::DateClosedDesc => "ORDER BY e.date_closed DESC, e.id DESC",
    }
}

/// Read access to maintenance events.
pub struct MaintenanceEventRepo;

impl MaintenanceEventRepo {
    /// Find an event by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM maintenance_events e WHERE e.id = $1"
        );
        sqlx::query_as::<_, MaintenanceEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The open event for an asset, if any. The state machine guarantees
    /// at most one exists.
    pub async fn find_open_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<MaintenanceEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM maintenance_events e \
             WHERE e.asset_id = $1 AND e.date_closed IS NULL"
        );
        sqlx::query_as::<_, MaintenanceEvent>(&query)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch one page of events matching the filter, in its requested
    /// order. The store truncates any single request to `limit` rows; the
    /// bulk reader stitches pages together.
    pub async fn fetch_page(
        pool: &PgPool,
        filter: &EventFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MaintenanceEvent>, sqlx::Error> {
        let (where_clause, next_idx) = build_where(filter, 1);
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM maintenance_events e \
             JOIN assets a ON a.id = e.asset_id \
             {where_clause} \
             {order} \
             LIMIT ${limit_idx} OFFSET ${offset_idx}",
            order = order_clause(filter.order),
            limit_idx = next_idx,
            offset_idx = next_idx + 1,
        );

        let mut q = sqlx::query_as::<_, MaintenanceEvent>(&query);
        if let Some(id) = filter.asset_id {
            q = q.bind(id);
        }
        if let Some(id) = filter.branch_id {
            q = q.bind(id);
        }
        if let Some(ts) = filter.opened_from {
            q = q.bind(ts);
        }
        if let Some(ts) = filter.opened_before {
            q = q.bind(ts);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Exact server-side count of events matching the filter. Immune to
    /// the per-request row cap, so aggregation buckets never undercount.
    pub async fn count(pool: &PgPool, filter: &EventFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = build_where(filter, 1);
        let query = format!(
            "SELECT COUNT(*) FROM maintenance_events e \
             JOIN assets a ON a.id = e.asset_id \
             {where_clause}"
        );

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(id) = filter.asset_id {
            q = q.bind(id);
        }
        if let Some(id) = filter.branch_id {
            q = q.bind(id);
        }
        if let Some(ts) = filter.opened_from {
            q = q.bind(ts);
        }
        if let Some(ts) = filter.opened_before {
            q = q.bind(ts);
        }
        q.fetch_one(pool).await
    }
}

//! Adapter plugging the maintenance ledger into the core bulk reader.

use async_trait::async_trait;
use sqlx::PgPool;

use sharptrack_core::bulk::{self, PageFetcher};
use sharptrack_core::error::CoreError;

use crate::models::maintenance_event::{EventFilter, MaintenanceEvent};
use crate::repositories::MaintenanceEventRepo;

/// Fixed number of rows the backing store returns per request. A property
/// of the store, not a tuning knob of any caller.
pub const STORE_PAGE_SIZE: i64 = 1000;

/// Binds one [`EventFilter`] to a pool so the bulk reader can walk its
/// pages.
pub struct EventPageFetcher<'a> {
    pool: &'a PgPool,
    filter: EventFilter,
}

impl<'a> EventPageFetcher<'a> {
    pub fn new(pool: &'a PgPool, filter: EventFilter) -> Self {
        Self { pool, filter }
    }
}

#[async_trait]
impl PageFetcher for EventPageFetcher<'_> {
    type Item = MaintenanceEvent;

    async fn fetch_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MaintenanceEvent>, CoreError> {
        MaintenanceEventRepo::fetch_page(self.pool, &self.filter, limit, offset)
            .await
            .map_err(|e| CoreError::DataAccess(e.to_string()))
    }
}

/// Materialize up to `max_records` events matching the filter, walking
/// store-sized pages sequentially.
pub async fn read_events(
    pool: &PgPool,
    filter: EventFilter,
    max_records: usize,
) -> Result<Vec<MaintenanceEvent>, CoreError> {
    let fetcher = EventPageFetcher::new(pool, filter);
    bulk::read_all(&fetcher, STORE_PAGE_SIZE, max_records).await
}

use std::sync::Arc;
use std::time::Duration;

use sharptrack_core::aggregation::{CategoryBreakdown, MonthBucket};
use sharptrack_core::cache::TtlCache;
use sharptrack_core::types::DbId;

use crate::config::ServerConfig;

/// Advisory cache for dashboard aggregates, keyed by the query's scope.
///
/// Only the dashboard endpoints consult it; the state machine and the
/// report endpoints always read the live ledger.
pub struct DashboardCache {
    /// Monthly trend series keyed by (branch scope, months).
    pub trend: TtlCache<(Option<DbId>, u32), Vec<MonthBucket>>,
    /// Category breakdown keyed by (branch scope, sample ceiling).
    pub categories: TtlCache<(Option<DbId>, usize), CategoryBreakdown>,
}

impl DashboardCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            trend: TtlCache::new(ttl),
            categories: TtlCache::new(ttl),
        }
    }

    /// Manual invalidation: drop everything in both caches.
    pub async fn invalidate_all(&self) {
        self.trend.invalidate_all().await;
        self.categories.invalidate_all().await;
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sharptrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Dashboard aggregate cache.
    pub dashboard_cache: Arc<DashboardCache>,
}

impl AppState {
    pub fn new(pool: sharptrack_db::DbPool, config: ServerConfig) -> Self {
        let cache = DashboardCache::new(Duration::from_secs(config.dashboard_cache_ttl_secs));
        Self {
            pool,
            config: Arc::new(config),
            dashboard_cache: Arc::new(cache),
        }
    }
}

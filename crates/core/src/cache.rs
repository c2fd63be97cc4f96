//! Keyed TTL cache for dashboard aggregates.
//!
//! Constructor-injected and explicitly invalidatable, replacing any notion
//! of ambient module-level caching. The cache is advisory: the lifecycle
//! state machine and report/export generation must never consult it.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// A cached value plus the instant it was stored.
struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// Map-backed cache where every entry expires `ttl` after insertion.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache with a fixed freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if it is still fresh.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    /// Store a value, resetting its freshness window.
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Drop every entry immediately.
    pub async fn invalidate_all(&self) {
        self.entries.write().await.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_entry_is_served() {
        let cache: TtlCache<i64, String> = TtlCache::new(Duration::from_secs(300));
        cache.insert(1, "series".to_string()).await;
        assert_eq!(cache.get(&1).await.as_deref(), Some("series"));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let cache: TtlCache<i64, String> = TtlCache::new(Duration::from_secs(300));
        assert!(cache.get(&42).await.is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_not_served() {
        let cache: TtlCache<i64, String> = TtlCache::new(Duration::ZERO);
        cache.insert(1, "stale".to_string()).await;
        assert!(cache.get(&1).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_drops_all_entries() {
        let cache: TtlCache<i64, i64> = TtlCache::new(Duration::from_secs(300));
        cache.insert(1, 10).await;
        cache.insert(2, 20).await;
        cache.invalidate_all().await;
        assert!(cache.get(&1).await.is_none());
        assert!(cache.get(&2).await.is_none());
    }

    #[tokio::test]
    async fn insert_overwrites_previous_value() {
        let cache: TtlCache<i64, i64> = TtlCache::new(Duration::from_secs(300));
        cache.insert(1, 10).await;
        cache.insert(1, 11).await;
        assert_eq!(cache.get(&1).await, Some(11));
    }
}

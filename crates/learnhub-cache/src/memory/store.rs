//! In-memory cache implementation using dashmap.
//!
//! Entries carry an absolute expiry computed from the injected [`Clock`], so
//! tests can move time forward without sleeping. Expired entries are purged
//! lazily by the reads that encounter them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;
use learnhub_core::traits::clock::Clock;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at_ms: i64,
}

impl Entry {
    fn is_live(&self, now_ms: i64) -> bool {
        self.expires_at_ms > now_ms
    }
}

/// In-memory cache provider with per-entry TTL.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    entries: Arc<DashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheProvider {
    /// Create an empty in-memory cache driven by `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, including any not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        let value = self
            .entries
            .get(key)
            .and_then(|e| e.is_live(now).then(|| e.value.clone()));
        if value.is_none() {
            self.entries.remove_if(key, |_, e| !e.is_live(now));
        }
        value
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at_ms = self.clock.now_ms().saturating_add(ttl_ms);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at_ms,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let now = self.clock.now_ms();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| entry.is_live(now)))
    }

    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<(String, String)>> {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "Purged expired cache entries");
        }

        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| (e.key().clone(), e.value().value.clone()))
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnhub_core::traits::clock::ManualClock;

    fn provider() -> (MemoryCacheProvider, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        (MemoryCacheProvider::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (cache, clock) = provider();
        cache.set("k", "v", Duration::from_secs(300)).await.unwrap();

        clock.advance(299_999);
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));

        clock.advance(1);
        assert!(cache.get("k").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_set_refreshes_ttl() {
        let (cache, clock) = provider();
        cache.set("k", "a", Duration::from_secs(300)).await.unwrap();
        clock.advance(250_000);
        cache.set("k", "b", Duration::from_secs(300)).await.unwrap();
        clock.advance(250_000);
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let (cache, _clock) = provider();
        cache.set("k", "v", Duration::from_secs(10)).await.unwrap();
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_scan_prefix_skips_expired_and_foreign_keys() {
        let (cache, clock) = provider();
        cache.set("presence:a", "1", Duration::from_secs(10)).await.unwrap();
        cache.set("presence:b", "2", Duration::from_secs(300)).await.unwrap();
        cache.set("other:c", "3", Duration::from_secs(300)).await.unwrap();

        clock.advance(10_000);
        let mut found = cache.scan_prefix("presence:").await.unwrap();
        found.sort();
        assert_eq!(found, vec![("presence:b".to_string(), "2".to_string())]);
        assert_eq!(cache.len(), 2);
    }
}

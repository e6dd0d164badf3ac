//! The ephemeral presence store.
//!
//! One [`HeartbeatRecord`] per recently active user, each under its own
//! self-expiring key. Failures never propagate: writes report a success
//! flag, point reads degrade to "not found" and scans degrade to an empty
//! set, so a store outage reads as everyone being offline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use learnhub_core::config::PresenceConfig;
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;
use learnhub_entity::presence::HeartbeatRecord;

use crate::handle::CacheHandle;
use crate::keys;

/// Presence record storage over the shared [`CacheHandle`].
#[derive(Debug, Clone)]
pub struct PresenceStore {
    handle: Arc<CacheHandle>,
    timeout: Duration,
}

impl PresenceStore {
    /// Create a store over `handle` using the configured operation timeout.
    pub fn new(handle: Arc<CacheHandle>, config: &PresenceConfig) -> Self {
        Self {
            handle,
            timeout: config.store_timeout(),
        }
    }

    /// Overwrite the record for `user_id` and reset its expiry to `ttl`.
    pub async fn put(&self, user_id: Uuid, record: &HeartbeatRecord, ttl: Duration) -> bool {
        let payload = match serde_json::to_string(record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to encode heartbeat record");
                return false;
            }
        };
        let key = keys::presence(user_id);

        match self
            .bounded("put", async {
                let manager = self.handle.get().await?;
                manager.set(&key, &payload, ttl).await
            })
            .await
        {
            Some(()) => true,
            None => {
                warn!(user_id = %user_id, "Presence write dropped");
                false
            }
        }
    }

    /// Fetch the live record for `user_id`, if any.
    pub async fn get(&self, user_id: Uuid) -> Option<HeartbeatRecord> {
        let key = keys::presence(user_id);
        let raw = self
            .bounded("get", async {
                let manager = self.handle.get().await?;
                manager.get(&key).await
            })
            .await
            .flatten()?;

        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(user_id = %user_id, error = %e, "Malformed presence record"))
            .ok()
    }

    /// Delete the record for `user_id`. Removing a missing record succeeds.
    pub async fn remove(&self, user_id: Uuid) -> bool {
        let key = keys::presence(user_id);
        match self
            .bounded("remove", async {
                let manager = self.handle.get().await?;
                manager.delete(&key).await
            })
            .await
        {
            Some(existed) => {
                debug!(user_id = %user_id, existed, "Presence record removed");
                true
            }
            None => false,
        }
    }

    /// Every live record. Entries that fail to decode are skipped.
    pub async fn scan_all(&self) -> Vec<HeartbeatRecord> {
        let Some(entries) = self
            .bounded("scan", async {
                let manager = self.handle.get().await?;
                manager.scan_prefix(keys::PRESENCE_PREFIX).await
            })
            .await
        else {
            return Vec::new();
        };

        let mut records = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let Some(user_id) = keys::parse_presence_key(&key) else {
                warn!(key = %key, "Skipping presence entry with unparseable key");
                continue;
            };
            match serde_json::from_str::<HeartbeatRecord>(&value) {
                Ok(record) if record.user_id == user_id => records.push(record),
                Ok(_) => warn!(key = %key, "Skipping presence entry keyed to another user"),
                Err(e) => warn!(key = %key, error = %e, "Skipping malformed presence entry"),
            }
        }
        records
    }

    /// Whether the backing store currently answers a health check.
    pub async fn is_available(&self) -> bool {
        self.bounded("health", async {
            let manager = self.handle.get().await?;
            manager.health_check().await
        })
        .await
        .unwrap_or(false)
    }

    /// Run `op` under the store timeout, logging and flattening failures.
    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(op, error = %e, "Presence store operation failed");
                None
            }
            Err(_) => {
                warn!(
                    op,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Presence store operation timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use learnhub_core::config::cache::CacheConfig;
    use learnhub_core::error::AppError;
    use learnhub_core::traits::clock::{Clock, ManualClock};

    use crate::provider::CacheManager;

    const T0: i64 = 1_700_000_000_000;
    const TTL: Duration = Duration::from_secs(300);

    fn memory_store() -> (PresenceStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let config = CacheConfig {
            provider: "memory".to_string(),
            ..CacheConfig::default()
        };
        let handle = Arc::new(CacheHandle::new(config, clock.clone(), 100));
        (PresenceStore::new(handle, &PresenceConfig::default()), clock)
    }

    fn store_over(provider: impl CacheProvider) -> PresenceStore {
        let manager = CacheManager::from_provider(Arc::new(provider));
        let clock = Arc::new(ManualClock::new(T0));
        let handle = Arc::new(CacheHandle::from_manager(manager, clock));
        PresenceStore::new(handle, &PresenceConfig::default())
    }

    fn record(user_id: Uuid, at: i64) -> HeartbeatRecord {
        HeartbeatRecord {
            user_id,
            name: Some("Grace Hopper".to_string()),
            email: None,
            role: None,
            department: None,
            last_seen_epoch_ms: at,
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl CacheProvider for FailingProvider {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::cache("connection refused"))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            Err(AppError::cache("connection refused"))
        }
        async fn delete(&self, _key: &str) -> AppResult<bool> {
            Err(AppError::cache("connection refused"))
        }
        async fn scan_prefix(&self, _prefix: &str) -> AppResult<Vec<(String, String)>> {
            Err(AppError::cache("connection refused"))
        }
        async fn health_check(&self) -> AppResult<bool> {
            Err(AppError::cache("connection refused"))
        }
    }

    #[derive(Debug)]
    struct StalledProvider;

    #[async_trait]
    impl CacheProvider for StalledProvider {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            std::future::pending().await
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            std::future::pending().await
        }
        async fn delete(&self, _key: &str) -> AppResult<bool> {
            std::future::pending().await
        }
        async fn scan_prefix(&self, _prefix: &str) -> AppResult<Vec<(String, String)>> {
            std::future::pending().await
        }
        async fn health_check(&self) -> AppResult<bool> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (store, clock) = memory_store();
        let id = Uuid::new_v4();
        assert!(store.put(id, &record(id, clock.now_ms()), TTL).await);
        assert_eq!(store.get(id).await, Some(record(id, T0)));
    }

    #[tokio::test]
    async fn test_refresh_keeps_record_alive_past_first_expiry() {
        let (store, clock) = memory_store();
        let id = Uuid::new_v4();
        store.put(id, &record(id, T0), TTL).await;

        clock.set(T0 + 250_000);
        store.put(id, &record(id, clock.now_ms()), TTL).await;

        clock.set(T0 + 300_001);
        let live = store.scan_all().await;
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].last_seen_epoch_ms, T0 + 250_000);
    }

    #[tokio::test]
    async fn test_record_absent_after_ttl_without_refresh() {
        let (store, clock) = memory_store();
        let id = Uuid::new_v4();
        store.put(id, &record(id, T0), TTL).await;

        clock.set(T0 + 300_000);
        assert!(store.scan_all().await.is_empty());
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (store, _clock) = memory_store();
        let id = Uuid::new_v4();
        store.put(id, &record(id, T0), TTL).await;
        assert!(store.remove(id).await);
        assert!(store.remove(id).await);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_scan_skips_malformed_entries() {
        let (store, _clock) = memory_store();
        let good = Uuid::new_v4();
        store.put(good, &record(good, T0), TTL).await;

        let manager = store.handle.get().await.unwrap();
        manager
            .set(&keys::presence(Uuid::new_v4()), "{not json", TTL)
            .await
            .unwrap();
        manager.set("presence:garbage", "{}", TTL).await.unwrap();

        let live = store.scan_all().await;
        assert_eq!(live, vec![record(good, T0)]);
    }

    #[tokio::test]
    async fn test_unreachable_store_degrades() {
        let store = store_over(FailingProvider);
        let id = Uuid::new_v4();
        assert!(!store.put(id, &record(id, T0), TTL).await);
        assert!(store.get(id).await.is_none());
        assert!(!store.remove(id).await);
        assert!(store.scan_all().await.is_empty());
        assert!(!store.is_available().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_times_out() {
        let store = store_over(StalledProvider);
        let id = Uuid::new_v4();
        assert!(!store.put(id, &record(id, T0), TTL).await);
        assert!(store.scan_all().await.is_empty());
    }
}

//! Cache provider trait for pluggable key-value backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for expiring key-value backends (Redis or in-memory).
///
/// All values are serialized as strings (JSON). The provider is
/// responsible for key prefixing and TTL enforcement: once a key's TTL
/// has elapsed it must be invisible to every read, including scans.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, overwriting any previous value and resetting its TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Return every live `(key, value)` pair whose key starts with `prefix`.
    ///
    /// Keys are returned without the provider's own namespace prefix.
    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<(String, String)>>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

//! Store provider trait for pluggable key-value backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for key-value store backends (Redis or in-memory).
///
/// All values are stored as strings (JSON-encoded by callers). The
/// provider is responsible for TTL enforcement: an expired key must be
/// indistinguishable from an absent one.
#[async_trait]
pub trait StoreProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL only if the key does not already exist (NX).
    ///
    /// This must be atomic at the store: of any number of concurrent calls
    /// for the same key, exactly one observes `true`. Returns `true` if the
    /// value was set, `false` if the key already existed.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists and has not expired.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

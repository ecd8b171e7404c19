//! In-memory store implementation backed by dashmap.
//!
//! Entries carry their own deadline so short TTLs behave the same way they
//! do on Redis. Suitable for tests and single-node development; a
//! multi-node deployment needs the Redis provider.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use stockhold_core::config::store::MemoryStoreConfig;
use stockhold_core::error::AppError;
use stockhold_core::result::AppResult;
use stockhold_core::traits::store::StoreProvider;

/// A stored value with its expiry deadline.
#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    expires_at: Instant,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory store provider with per-entry TTL.
#[derive(Debug)]
pub struct MemoryStoreProvider {
    /// Live entries. Expired entries are dropped lazily on access.
    entries: DashMap<String, StoredEntry>,
    /// Maximum number of live entries.
    max_capacity: u64,
}

impl MemoryStoreProvider {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryStoreConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_capacity: config.max_capacity,
        }
    }

    /// Drop every entry whose deadline has passed.
    fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }
}

#[async_trait]
impl StoreProvider for MemoryStoreProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        let (value, expired) = match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => (None, true),
            Some(entry) => (Some(entry.value.clone()), false),
            None => (None, false),
        };
        // The read guard is released above; removal must not hold it.
        if expired {
            self.entries
                .remove_if(key, |_, entry| entry.is_expired(now));
        }
        Ok(value)
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();

        if self.entries.len() as u64 >= self.max_capacity {
            self.purge_expired();
            if self.entries.len() as u64 >= self.max_capacity && !self.entries.contains_key(key) {
                return Err(AppError::store("memory store at capacity"));
            }
        }

        // The entry API locks the key's shard, making check-then-insert
        // atomic: of concurrent callers, exactly one sees the slot vacant.
        let created = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(now) {
                    occupied.insert(StoredEntry {
                        value: value.to_string(),
                        expires_at: now + ttl,
                    });
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredEntry {
                    value: value.to_string(),
                    expires_at: now + ttl,
                });
                true
            }
        };

        if created {
            debug!(key, ttl_seconds = ttl.as_secs(), "Stored entry (NX)");
        }
        Ok(created)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => true,
            Some(_) => return Ok(true),
            None => return Ok(false),
        };
        if expired {
            self.entries
                .remove_if(key, |_, entry| entry.is_expired(now));
        }
        Ok(false)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryStoreProvider {
        let config = MemoryStoreConfig { max_capacity: 1000 };
        MemoryStoreProvider::new(&config)
    }

    #[tokio::test]
    async fn test_set_nx_then_get() {
        let provider = make_provider();
        let created = provider
            .set_nx("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(created);
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_set_nx_first_wins() {
        let provider = make_provider();
        let first = provider
            .set_nx("nx_key", "val", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(first);
        let second = provider
            .set_nx("nx_key", "val2", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(!second);
        // Loser must not overwrite the winner's value.
        assert_eq!(
            provider.get("nx_key").await.unwrap(),
            Some("val".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let provider = make_provider();
        provider
            .set_nx("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        provider.delete("key2").await.unwrap();
        provider.delete("key2").await.unwrap();
        assert_eq!(provider.get("key2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let provider = make_provider();
        provider
            .set_nx("short", "v", Duration::from_millis(20))
            .await
            .unwrap();
        assert!(provider.exists("short").await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(provider.get("short").await.unwrap(), None);
        assert!(!provider.exists("short").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_nx_succeeds_after_expiry() {
        let provider = make_provider();
        provider
            .set_nx("cycle", "first", Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        let created = provider
            .set_nx("cycle", "second", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(
            provider.get("cycle").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let config = MemoryStoreConfig { max_capacity: 2 };
        let provider = MemoryStoreProvider::new(&config);
        provider
            .set_nx("a", "1", Duration::from_secs(60))
            .await
            .unwrap();
        provider
            .set_nx("b", "2", Duration::from_secs(60))
            .await
            .unwrap();
        let err = provider
            .set_nx("c", "3", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert_eq!(err.kind, stockhold_core::error::ErrorKind::Store);
    }

    #[tokio::test]
    async fn test_health_check() {
        let provider = make_provider();
        assert!(provider.health_check().await.unwrap());
    }
}

//! The reservation manager: Reserve, Check, and Release over the store.
//!
//! The manager is stateless between calls. Mutual exclusion comes entirely
//! from the store's atomic set-if-absent; there is no client-side locking,
//! no retry loop, and no compare-and-swap. Expiry is owned by the store's
//! TTL — once a key's presence is confirmed, the manager never re-checks
//! wall-clock time against the stored timestamp.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use stockhold_core::config::reservation::ReservationConfig;
use stockhold_core::error::AppError;
use stockhold_core::result::AppResult;
use stockhold_core::traits::store::StoreProvider;
use stockhold_store::{StoreManager, keys};

use super::record::{HoldRecord, decode_hold};

/// Outcome of a reserve attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The conditional write took effect; this caller now holds the slot.
    Created {
        /// Expiry of the newly created hold.
        reserved_until: DateTime<Utc>,
    },
    /// The key was already present. Carries the competing hold's expiry
    /// when it could be read back, best-effort.
    AlreadyHeld {
        /// Expiry of the existing hold, if readable.
        reserved_until: Option<DateTime<Utc>>,
    },
}

/// Result of a status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldStatus {
    /// Whether the variant is currently reserved.
    pub reserved: bool,
    /// Expiry of the current hold, when one exists and is decodable.
    pub reserved_until: Option<DateTime<Utc>>,
}

/// Stateless protocol layer over the key-value store.
///
/// Holds only immutable dependencies: the injected store handle and the
/// hold duration, both fixed at construction.
#[derive(Debug, Clone)]
pub struct ReservationManager {
    /// The key-value store.
    store: Arc<StoreManager>,
    /// Hold duration in seconds.
    hold_seconds: u64,
}

impl ReservationManager {
    /// Create a new reservation manager from configuration.
    pub fn new(store: Arc<StoreManager>, config: &ReservationConfig) -> Self {
        Self {
            store,
            hold_seconds: config.hold_seconds,
        }
    }

    /// Reserve a variant's purchasable slot.
    ///
    /// Issues a single atomic set-if-absent with TTL. Exactly one of any
    /// number of concurrent calls for the same variant succeeds; the rest
    /// observe [`ReserveOutcome::AlreadyHeld`].
    pub async fn reserve(&self, variant_id: &str) -> AppResult<ReserveOutcome> {
        let variant_id = validate_variant_id(variant_id)?;
        let key = keys::variant_hold(variant_id);

        let reserved_until = Utc::now() + chrono::Duration::seconds(self.hold_seconds as i64);
        let record = HoldRecord {
            reserved_until: Some(reserved_until),
        };
        let value = serde_json::to_string(&record)?;

        let created = self
            .store
            .set_nx(&key, &value, Duration::from_secs(self.hold_seconds))
            .await?;

        if created {
            info!(variant_id, %reserved_until, "Variant reserved");
            return Ok(ReserveOutcome::Created { reserved_until });
        }

        // Lost the race. Read the winner's expiry for reporting; the key
        // may already be gone again, which reads as None.
        let existing = self.store.get(&key).await?;
        let reserved_until = existing
            .as_deref()
            .map(decode_hold)
            .and_then(|r| r.reserved_until);

        debug!(variant_id, ?reserved_until, "Variant already held");
        Ok(ReserveOutcome::AlreadyHeld { reserved_until })
    }

    /// Report whether a variant is currently reserved.
    ///
    /// Read-only. An absent key and an undecodable value both report as
    /// not reserved.
    pub async fn check(&self, variant_id: &str) -> AppResult<HoldStatus> {
        let variant_id = validate_variant_id(variant_id)?;
        let key = keys::variant_hold(variant_id);

        let status = match self.store.get(&key).await? {
            Some(raw) => {
                let record = decode_hold(&raw);
                HoldStatus {
                    reserved: record.reserved_until.is_some(),
                    reserved_until: record.reserved_until,
                }
            }
            None => HoldStatus {
                reserved: false,
                reserved_until: None,
            },
        };

        Ok(status)
    }

    /// Release a variant's hold.
    ///
    /// Unconditional and idempotent: deleting an absent key is success.
    /// There is no ownership check — any authenticated caller may release
    /// any hold.
    pub async fn release(&self, variant_id: &str) -> AppResult<()> {
        let variant_id = validate_variant_id(variant_id)?;
        let key = keys::variant_hold(variant_id);

        self.store.delete(&key).await?;
        info!(variant_id, "Variant hold released");
        Ok(())
    }
}

/// Reject empty identifiers before any store access.
fn validate_variant_id(variant_id: &str) -> AppResult<&str> {
    let trimmed = variant_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("variant_id is required"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    use stockhold_core::config::store::MemoryStoreConfig;
    use stockhold_core::error::ErrorKind;
    use stockhold_store::memory::MemoryStoreProvider;

    fn make_manager(hold_seconds: u64) -> (ReservationManager, Arc<StoreManager>) {
        let provider = MemoryStoreProvider::new(&MemoryStoreConfig { max_capacity: 1000 });
        let store = Arc::new(StoreManager::from_provider(Arc::new(provider)));
        let manager = ReservationManager::new(Arc::clone(&store), &ReservationConfig { hold_seconds });
        (manager, store)
    }

    #[tokio::test]
    async fn test_reserve_conflict_check_release_cycle() {
        let (manager, _) = make_manager(3600);

        let first = manager.reserve("42").await.unwrap();
        let ReserveOutcome::Created { reserved_until } = first else {
            panic!("first reserve should create the hold");
        };

        let second = manager.reserve("42").await.unwrap();
        assert_eq!(
            second,
            ReserveOutcome::AlreadyHeld {
                reserved_until: Some(reserved_until)
            }
        );

        let status = manager.check("42").await.unwrap();
        assert!(status.reserved);
        assert_eq!(status.reserved_until, Some(reserved_until));

        manager.release("42").await.unwrap();

        let status = manager.check("42").await.unwrap();
        assert!(!status.reserved);
        assert_eq!(status.reserved_until, None);
    }

    #[tokio::test]
    async fn test_reserved_until_is_now_plus_hold() {
        let (manager, _) = make_manager(3600);
        let before = Utc::now();
        let ReserveOutcome::Created { reserved_until } = manager.reserve("7").await.unwrap() else {
            panic!("reserve should succeed on an empty store");
        };
        let after = Utc::now();

        assert!(reserved_until >= before + chrono::Duration::seconds(3600));
        assert!(reserved_until <= after + chrono::Duration::seconds(3600));
    }

    #[tokio::test]
    async fn test_concurrent_reserves_have_one_winner() {
        let (manager, _) = make_manager(3600);
        let manager = Arc::new(manager);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(
                async move { manager.reserve("contested").await },
            ));
        }

        let mut winners = Vec::new();
        let mut losers = Vec::new();
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                ReserveOutcome::Created { reserved_until } => winners.push(reserved_until),
                ReserveOutcome::AlreadyHeld { reserved_until } => losers.push(reserved_until),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(losers.len(), 15);
        for lost in losers {
            assert_eq!(lost, Some(winners[0]));
        }
    }

    #[tokio::test]
    async fn test_hold_expires_and_slot_frees() {
        let (manager, _) = make_manager(1);

        let first = manager.reserve("77").await.unwrap();
        assert!(matches!(first, ReserveOutcome::Created { .. }));
        assert!(manager.check("77").await.unwrap().reserved);

        tokio::time::sleep(Duration::from_millis(1200)).await;

        let status = manager.check("77").await.unwrap();
        assert!(!status.reserved);

        let again = manager.reserve("77").await.unwrap();
        assert!(matches!(again, ReserveOutcome::Created { .. }));
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let (manager, _) = make_manager(3600);
        manager.release("never-reserved").await.unwrap();
        manager.release("never-reserved").await.unwrap();
        assert!(!manager.check("never-reserved").await.unwrap().reserved);
    }

    #[tokio::test]
    async fn test_check_tolerates_malformed_stored_value() {
        let (manager, store) = make_manager(3600);
        store
            .set_nx(
                &keys::variant_hold("99"),
                "definitely not json",
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let status = manager.check("99").await.unwrap();
        assert!(!status.reserved);
        assert_eq!(status.reserved_until, None);
    }

    #[tokio::test]
    async fn test_conflict_against_malformed_value_reports_none() {
        let (manager, store) = make_manager(3600);
        store
            .set_nx(&keys::variant_hold("99"), "{broken", Duration::from_secs(60))
            .await
            .unwrap();

        let outcome = manager.reserve("99").await.unwrap();
        assert_eq!(
            outcome,
            ReserveOutcome::AlreadyHeld {
                reserved_until: None
            }
        );
    }

    #[tokio::test]
    async fn test_empty_variant_id_is_rejected() {
        let (manager, _) = make_manager(3600);

        let err = manager.reserve("").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = manager.check("   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = manager.release("").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_variant_id_is_trimmed() {
        let (manager, _) = make_manager(3600);
        manager.reserve(" 42 ").await.unwrap();
        assert!(manager.check("42").await.unwrap().reserved);
    }
}

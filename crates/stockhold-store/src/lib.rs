//! # stockhold-store
//!
//! Key-value store implementations for Stockhold. Supports two modes:
//!
//! - **memory**: In-process store with per-entry expiry, for tests and
//!   single-node development
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. Reservation
//! correctness rests on the provider's `set_nx`: a single atomic
//! set-if-absent with TTL is the only mutual-exclusion primitive used.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;

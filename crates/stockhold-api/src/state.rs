//! Application state shared across all handlers.

use std::sync::Arc;

use stockhold_auth::ProxySignatureVerifier;
use stockhold_core::config::AppConfig;
use stockhold_service::ReservationManager;
use stockhold_store::StoreManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Key-value store manager (Redis or in-memory)
    pub store: Arc<StoreManager>,
    /// App-proxy signature verifier
    pub signature: Arc<ProxySignatureVerifier>,
    /// Reservation protocol manager
    pub reservations: Arc<ReservationManager>,
}

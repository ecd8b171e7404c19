//! Route definitions for the Stockhold HTTP API.
//!
//! The reservation endpoint lives at the app-proxy path `/apps/reserve`;
//! health endpoints are mounted under `/api`. The router receives
//! `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(proxy_routes())
        .nest("/api", health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// App-proxy reservation endpoint. One route, action-dispatched.
fn proxy_routes() -> Router<AppState> {
    Router::new().route(
        "/apps/reserve",
        get(handlers::reserve::reserve_proxy).post(handlers::reserve::reserve_proxy),
    )
}

/// Health check endpoints (no signature required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

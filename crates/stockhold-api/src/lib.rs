//! # stockhold-api
//!
//! HTTP API layer for Stockhold: the app-proxy reservation endpoint,
//! health checks, and shared application state.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;

//! # stockhold-core
//!
//! Core crate for Stockhold. Contains the store provider trait,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Stockhold crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

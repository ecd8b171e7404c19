//! Store key builders for all Stockhold entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Prefix applied to all reservation keys.
const PREFIX: &str = "reserve";

/// Store key for the purchasable-slot hold of a product variant.
pub fn variant_hold(variant_id: &str) -> String {
    format!("{PREFIX}:variant:{variant_id}")
}

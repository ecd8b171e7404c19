//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Outcome of a reserve attempt.
///
/// Returned with 200 when the hold was created, or 409 when the variant
/// was already held (carrying the competing hold's expiry when readable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveResponse {
    /// Whether this caller now holds the slot.
    pub reserved: bool,
    /// Expiry of the relevant hold.
    pub reserved_until: Option<DateTime<Utc>>,
}

/// Current reservation status of a variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldStatusResponse {
    /// Whether the variant is currently reserved.
    pub reserved: bool,
    /// Expiry of the current hold, if any.
    pub reserved_until: Option<DateTime<Utc>>,
}

/// Acknowledgement of a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Always true: releasing an absent hold is still success.
    pub released: bool,
}

/// Basic health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Detailed health response including dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Service status.
    pub status: String,
    /// Store reachability.
    pub store: String,
}

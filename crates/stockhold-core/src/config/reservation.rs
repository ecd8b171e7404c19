//! Reservation protocol configuration.

use serde::{Deserialize, Serialize};

/// Reservation hold settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// How long a reservation remains valid before automatic expiry, in seconds.
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            hold_seconds: default_hold_seconds(),
        }
    }
}

fn default_hold_seconds() -> u64 {
    3600
}

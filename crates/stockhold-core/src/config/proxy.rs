//! App-proxy signature configuration.

use serde::{Deserialize, Serialize};

/// Shared-secret configuration for inbound proxy signature verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyAuthConfig {
    /// Shared secret used to compute the HMAC-SHA256 request signature.
    pub shared_secret: String,
}

//! App-proxy request signature verification.
//!
//! The proxy signs each request with HMAC-SHA256 over the query parameters:
//! every `key=value` pair except `signature` itself, sorted by key and
//! concatenated without a separator, digested with the shared secret and
//! hex-encoded.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use stockhold_core::config::proxy::ProxyAuthConfig;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the signature, excluded from the signed message.
const SIGNATURE_PARAM: &str = "signature";

/// Verifies the HMAC-SHA256 signature the app proxy attaches to requests.
///
/// Constructed once at startup from configuration and shared across
/// handlers as an immutable dependency.
#[derive(Debug, Clone)]
pub struct ProxySignatureVerifier {
    /// Shared secret the proxy signs with.
    secret: String,
}

impl ProxySignatureVerifier {
    /// Create a new verifier from configuration.
    pub fn new(config: &ProxyAuthConfig) -> Self {
        Self {
            secret: config.shared_secret.clone(),
        }
    }

    /// Compute the hex-encoded signature for a set of query parameters.
    ///
    /// The `signature` parameter is ignored if present.
    pub fn sign(&self, params: &HashMap<String, String>) -> String {
        let message = canonical_message(params);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify the `signature` parameter against the remaining parameters.
    ///
    /// Returns `false` when the signature is missing, not valid hex, or
    /// does not match. Comparison is constant-time via the hmac crate.
    pub fn verify(&self, params: &HashMap<String, String>) -> bool {
        let Some(provided) = params.get(SIGNATURE_PARAM) else {
            debug!("Request carried no signature parameter");
            return false;
        };
        let Ok(provided_bytes) = hex::decode(provided) else {
            debug!("Signature parameter was not valid hex");
            return false;
        };

        let message = canonical_message(params);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(message.as_bytes());
        mac.verify_slice(&provided_bytes).is_ok()
    }
}

/// Build the canonical message: sorted `key=value` pairs, concatenated,
/// with the signature parameter excluded.
fn canonical_message(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .filter(|(k, _)| k.as_str() != SIGNATURE_PARAM)
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort();

    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("")
}

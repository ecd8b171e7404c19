//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Optional JSON body for POST requests to the reservation endpoint.
///
/// The storefront usually passes `variant_id` in the query string, but a
/// POST body is accepted as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReserveBody {
    /// Product variant identifier.
    pub variant_id: Option<String>,
}

//! The hold record stored under a variant's reservation key.
//!
//! Depending on how a value was written (or corrupted), the store can hand
//! back a well-formed record, some other JSON shape, or a string that is
//! not JSON at all. Decoding normalizes all of these at this boundary and
//! fails soft: malformed content reads as "no reservation info", never as
//! an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The JSON value written by a successful reserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldRecord {
    /// Absolute expiry timestamp of the hold, UTC.
    #[serde(default)]
    pub reserved_until: Option<DateTime<Utc>>,
}

impl HoldRecord {
    /// An empty record: the key exists but carries no usable expiry.
    pub fn empty() -> Self {
        Self {
            reserved_until: None,
        }
    }
}

/// A stored value as it arrives from the store: either a decodable hold
/// record or some other JSON shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredHold {
    Decoded(HoldRecord),
    Other(serde_json::Value),
}

/// Decode a raw stored value into a [`HoldRecord`].
///
/// Non-JSON input and JSON of the wrong shape both normalize to an empty
/// record rather than propagating a decode error.
pub fn decode_hold(raw: &str) -> HoldRecord {
    match serde_json::from_str::<StoredHold>(raw) {
        Ok(StoredHold::Decoded(record)) => record,
        Ok(StoredHold::Other(_)) | Err(_) => HoldRecord::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_well_formed_record() {
        let record = decode_hold(r#"{"reserved_until":"2026-08-07T12:00:00Z"}"#);
        let expected = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        assert_eq!(record.reserved_until, Some(expected));
    }

    #[test]
    fn test_decode_round_trips_encoded_record() {
        let original = HoldRecord {
            reserved_until: Some(Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()),
        };
        let encoded = serde_json::to_string(&original).unwrap();
        assert_eq!(decode_hold(&encoded), original);
    }

    #[test]
    fn test_decode_null_expiry() {
        let record = decode_hold(r#"{"reserved_until":null}"#);
        assert_eq!(record.reserved_until, None);
    }

    #[test]
    fn test_decode_missing_field() {
        let record = decode_hold(r#"{"something_else":true}"#);
        assert_eq!(record.reserved_until, None);
    }

    #[test]
    fn test_decode_wrong_type_fails_soft() {
        let record = decode_hold(r#"{"reserved_until":12345}"#);
        assert_eq!(record.reserved_until, None);
    }

    #[test]
    fn test_decode_non_object_json_fails_soft() {
        assert_eq!(decode_hold("[1,2,3]"), HoldRecord::empty());
        assert_eq!(decode_hold("42"), HoldRecord::empty());
        assert_eq!(decode_hold(r#""just a string""#), HoldRecord::empty());
    }

    #[test]
    fn test_decode_garbage_fails_soft() {
        assert_eq!(decode_hold("not json at all"), HoldRecord::empty());
        assert_eq!(decode_hold(""), HoldRecord::empty());
    }
}

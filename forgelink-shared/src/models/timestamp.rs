//! Timestamp newtype used by all ForgeLink wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// UTC timestamp that serializes as an ISO-8601 / RFC 3339 string.
///
/// Wrapping [`chrono::DateTime`] keeps the wire format pinned in one place:
/// every `created_at` field a client sees goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(value_type = String, format = DateTime)]
pub struct Timestamp(pub DateTime<Utc>);

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_as_iso_8601() {
        let dt = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap();
        let serialized = serde_json::to_string(&Timestamp(dt)).unwrap();
        assert_eq!(serialized, "\"2025-06-01T12:30:45Z\"");
    }

    #[test]
    fn round_trips_through_serde() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let original = Timestamp(dt);
        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: Timestamp = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, original);
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Timestamp;

/// A named topic that scopes messages and live connections.
///
/// Channels are immutable after creation. When no channels exist yet, the
/// backend seeds a fixed default set on the first listing request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Channel {
    /// Unique identifier assigned by the database.
    pub id: i64,

    /// Unique display name, e.g. `general`.
    pub name: String,

    /// Short human-readable description shown in channel lists.
    pub description: String,

    /// Visibility kind. Currently only `public` exists.
    #[serde(rename = "type")]
    pub kind: String,

    /// Timestamp the channel was created.
    pub created_at: Timestamp,
}

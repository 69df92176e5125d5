use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Timestamp;

/// A chat message as delivered to clients, over both the live WebSocket path
/// and the history API.
///
/// The record is denormalized with the author's current display attributes
/// (`username`, `avatar_url`) resolved at the time the message was persisted
/// or the page was read. `id` and `created_at` are always server-assigned:
/// clients never see a message that was not durably stored first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ChannelMessage {
    /// Server-assigned message identifier.
    pub id: i64,

    /// The message text.
    pub content: String,

    /// Identifier of the authoring user.
    pub user_id: i64,

    /// Author's username at resolution time.
    pub username: String,

    /// Author's avatar URL, if any.
    pub avatar_url: Option<String>,

    /// Server-assigned creation timestamp.
    pub created_at: Timestamp,

    /// Single-level reply reference to an earlier message in the channel.
    pub parent_id: Option<i64>,
}

/// An inbound WebSocket frame from a client.
///
/// The only required payload is `content`; a frame whose content is missing or
/// empty is silently skipped by the session handler. `parent_id` may reference
/// an existing message for a single-level reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundFrame {
    /// The message text. Defaults to empty when the key is absent so that
    /// missing-content and empty-content frames take the same (skip) path.
    #[serde(default)]
    pub content: String,

    /// Optional reply reference.
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_message() -> ChannelMessage {
        ChannelMessage {
            id: 42,
            content: "hi".to_string(),
            user_id: 7,
            username: "ada".to_string(),
            avatar_url: Some("https://example.com/ada.png".to_string()),
            created_at: Timestamp(Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap()),
            parent_id: None,
        }
    }

    #[test]
    fn channel_message_round_trips() {
        let message = sample_message();
        let serialized = serde_json::to_string(&message).unwrap();
        let deserialized: ChannelMessage = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, message);
    }

    #[test]
    fn channel_message_created_at_is_iso_8601() {
        let value = serde_json::to_value(sample_message()).unwrap();
        assert_eq!(value["created_at"], "2025-03-08T14:30:00Z");
    }

    #[test]
    fn inbound_frame_defaults_missing_content_to_empty() {
        let frame: InboundFrame = serde_json::from_str("{}").unwrap();
        assert!(frame.content.is_empty());
        assert_eq!(frame.parent_id, None);
    }

    #[test]
    fn inbound_frame_accepts_reply_reference() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"content":"hello","parent_id":12}"#).unwrap();
        assert_eq!(frame.content, "hello");
        assert_eq!(frame.parent_id, Some(12));
    }
}

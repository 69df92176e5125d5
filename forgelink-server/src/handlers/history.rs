use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::{config::server::Config, models::ChannelMessage};

use crate::{
    app_state::AppState,
    http::error::{ApiError, AppResult},
};

/// Page window for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Page size; defaults to the configured history limit.
    pub limit: Option<i64>,
    /// Page offset into the descending timeline; defaults to 0.
    pub offset: Option<i64>,
}

/// Returns a page of a channel's message history.
///
/// The caller always receives an ascending chronological page representing
/// the most recent `limit` messages at the given `offset`. This path is
/// purely additive with the live WebSocket path and never touches the
/// connection registry.
#[utoipa::path(
    get,
    path = "/chat/channels/{channel_id}/messages",
    params(
        ("channel_id" = i64, Path, description = "Channel identifier"),
        ("limit" = Option<i64>, Query, description = "Page size, defaults to 50"),
        ("offset" = Option<i64>, Query, description = "Page offset, defaults to 0")
    ),
    responses(
        (status = 200, description = "Ascending page of the most recent messages", body = [ChannelMessage]),
        (status = 503, description = "Chat store is not configured")
    ),
    tag = "Chat"
)]
pub async fn channel_history(
    Path(channel_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
    Extension(config): Extension<Arc<Config>>,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<ChannelMessage>>> {
    let store = state
        .chat
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("chat store is not configured"))?;

    let limit = query.limit.unwrap_or(config.chat.default_history_limit);
    let offset = query.offset.unwrap_or(0);

    let messages = store.channel_history(channel_id, limit, offset).await?;
    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chat_service::MockChatStore;
    use axum::{Router, body::Body, http::Request, routing::get};
    use chrono::{Duration, TimeZone, Utc};
    use mockall::predicate::eq;
    use shared::models::Timestamp;
    use tower::ServiceExt;

    fn message(id: i64, content: &str, minute: i64) -> ChannelMessage {
        let base = Utc.with_ymd_and_hms(2025, 3, 8, 14, 0, 0).unwrap();
        ChannelMessage {
            id,
            content: content.to_string(),
            user_id: 3,
            username: "ada".to_string(),
            avatar_url: None,
            created_at: Timestamp(base + Duration::minutes(minute)),
            parent_id: None,
        }
    }

    fn app(store: MockChatStore) -> Router {
        let chat: Arc<dyn crate::services::chat_service::ChatStore> = Arc::new(store);
        let state = Arc::new(AppState {
            pool: None,
            chat: Some(chat),
        });
        Router::new()
            .route(
                "/chat/channels/{channel_id}/messages",
                get(channel_history),
            )
            .layer(Extension(Arc::new(Config::with_defaults())))
            .with_state(state)
    }

    async fn fetch(app: Router, uri: &str) -> Vec<ChannelMessage> {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn applies_the_configured_defaults() {
        let mut store = MockChatStore::new();
        store
            .expect_channel_history()
            .with(eq(7), eq(50), eq(0))
            .times(1)
            .returning(|_, _, _| Ok(vec![message(1, "first", 0), message(2, "second", 1)]));

        let messages = fetch(app(store), "/chat/channels/7/messages").await;
        assert_eq!(messages.len(), 2);
        // The page arrives in ascending chronological order.
        assert!(messages[0].created_at.0 < messages[1].created_at.0);
        assert_eq!(messages[1].content, "second");
    }

    #[tokio::test]
    async fn forwards_explicit_limit_and_offset() {
        let mut store = MockChatStore::new();
        store
            .expect_channel_history()
            .with(eq(7), eq(10), eq(20))
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let messages = fetch(app(store), "/chat/channels/7/messages?limit=10&offset=20").await;
        assert!(messages.is_empty());
    }
}

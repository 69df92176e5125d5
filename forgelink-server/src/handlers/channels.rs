use std::sync::Arc;

use axum::{Json, extract::State};
use shared::models::Channel;

use crate::{
    app_state::AppState,
    http::error::{ApiError, AppResult},
};

/// Lists all chat channels.
///
/// When no channels exist yet the default set is seeded first, so the first
/// caller after a fresh deployment already sees the platform channels.
#[utoipa::path(
    get,
    path = "/chat/channels",
    responses(
        (status = 200, description = "All channels, seeded on first request", body = [Channel]),
        (status = 503, description = "Chat store is not configured")
    ),
    tag = "Chat"
)]
pub async fn list_channels(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Channel>>> {
    let store = state
        .chat
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("chat store is not configured"))?;

    let channels = store.list_or_seed_channels().await?;
    Ok(Json(channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chat_service::MockChatStore;
    use axum::{Router, body::Body, http::Request, routing::get};
    use chrono::{TimeZone, Utc};
    use shared::models::Timestamp;
    use tower::ServiceExt;

    fn channel(id: i64, name: &str) -> Channel {
        Channel {
            id,
            name: name.to_string(),
            description: format!("{name} talk"),
            kind: "public".to_string(),
            created_at: Timestamp(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    fn app(store: MockChatStore) -> Router {
        let chat: Arc<dyn crate::services::chat_service::ChatStore> = Arc::new(store);
        let state = Arc::new(AppState {
            pool: None,
            chat: Some(chat),
        });
        Router::new()
            .route("/chat/channels", get(list_channels))
            .with_state(state)
    }

    #[tokio::test]
    async fn returns_the_channel_list() {
        let mut store = MockChatStore::new();
        store
            .expect_list_or_seed_channels()
            .times(1)
            .returning(|| Ok(vec![channel(1, "general"), channel(2, "help")]));

        let response = app(store)
            .oneshot(
                Request::builder()
                    .uri("/chat/channels")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let channels: Vec<Channel> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "general");
    }

    #[tokio::test]
    async fn reports_service_unavailable_without_a_store() {
        let app = Router::new()
            .route("/chat/channels", get(list_channels))
            .with_state(Arc::new(AppState::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/chat/channels")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            axum::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }
}

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{app_state::AppState, handlers};

/// Builds the chat router: channel listing, message history, and the live
/// WebSocket endpoint.
pub fn create_router_chat() -> Router<Arc<AppState>> {
    Router::new()
        .route("/channels", get(handlers::channels::list_channels))
        .route(
            "/channels/{channel_id}/messages",
            get(handlers::history::channel_history),
        )
        .route("/ws/{channel_id}", get(handlers::channel_ws::channel_ws))
}

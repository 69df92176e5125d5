//! Per-connection WebSocket session handler for channel chat.
//!
//! Each connection moves through `Connecting → Authenticating → Active →
//! Closed`. The upgrade is accepted unconditionally so an authentication
//! failure can be signaled over the socket itself (close code 1008) rather
//! than as a connection-establishment error. Once active, nothing short of a
//! transport-level disconnect ends the session: malformed frames and
//! persistence failures are contained to the frame that caused them.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{
        Path, Query, State, WebSocketUpgrade,
        ws::{CloseFrame, Message, WebSocket, close_code},
    },
    http::{HeaderMap, header},
    response::Response,
};
use cookie::Cookie;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::{config::server::Config, models::InboundFrame};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    app_state::AppState,
    auth::token::TokenVerifier,
    services::{channel_registry::ChannelRegistry, chat_service::ChatStore},
};

/// Connection-establishment parameters.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Bearer credential; beats the cookie when both are present.
    pub token: Option<String>,
}

/// WebSocket endpoint for a channel's live session.
pub async fn channel_ws(
    Path(channel_id): Path<i64>,
    Query(query): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<Arc<Config>>,
    Extension(registry): Extension<Arc<ChannelRegistry>>,
    Extension(verifier): Extension<Arc<TokenVerifier>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let token = resolve_token(query.token, &headers, &config.auth.token_cookie_name);
    let store = state.chat.clone();

    ws.on_upgrade(move |socket| run_session(socket, channel_id, token, verifier, registry, store))
}

/// Picks the bearer credential for a connection attempt.
///
/// The `token` query parameter takes precedence; otherwise the access-token
/// cookie is consulted. Returning `None` means the attempt is closed with a
/// policy-violation status.
fn resolve_token(
    query_token: Option<String>,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Option<String> {
    query_token
        .filter(|token| !token.is_empty())
        .or_else(|| extract_token_cookie(headers, cookie_name))
}

fn extract_token_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(header::COOKIE)?.to_str().ok()?;
    Cookie::split_parse(value)
        .flatten()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

async fn run_session(
    socket: WebSocket,
    channel_id: i64,
    token: Option<String>,
    verifier: Arc<TokenVerifier>,
    registry: Arc<ChannelRegistry>,
    store: Option<Arc<dyn ChatStore>>,
) {
    let (mut sink, mut stream) = socket.split();

    // Authenticating: missing and invalid credentials are signaled the same
    // way, and the registry is never touched for a rejected connection.
    let user_id = match token.as_deref().map(|token| verifier.verify(token)) {
        Some(Ok(user_id)) => user_id,
        Some(Err(_)) | None => {
            warn!(channel_id, "closing unauthenticated channel connection");
            metrics::counter!("chat_ws_auth_failures_total").increment(1);
            let _ = sink
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "authentication failed".into(),
                })))
                .await;
            return;
        }
    };

    let Some(store) = store else {
        error!(channel_id, "chat store unavailable, closing connection");
        let _ = sink
            .send(Message::Close(Some(CloseFrame {
                code: close_code::ERROR,
                reason: "service unavailable".into(),
            })))
            .await;
        return;
    };

    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();
    let connection_id = registry.register(channel_id, sender).await;
    metrics::gauge!("chat_ws_connections").increment(1.0);
    info!(channel_id, user_id, "channel session active");

    // Drain registry broadcasts into the socket until either side closes.
    let forward = tokio::spawn(async move {
        while let Some(payload) = receiver.recv().await {
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_inbound_frame(store.as_ref(), &registry, channel_id, user_id, text.as_str())
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(channel_id, user_id, error = %err, "channel transport error");
                break;
            }
        }
    }

    // Closed: release registry membership before the task exits.
    registry.deregister(channel_id, connection_id).await;
    metrics::gauge!("chat_ws_connections").decrement(1.0);
    forward.abort();
    info!(channel_id, user_id, "channel session closed");
}

/// Processes one inbound text frame.
///
/// Nothing here ends the session. A frame that cannot be decoded is logged
/// and skipped; a frame with empty content is skipped silently; a storage
/// failure drops the frame but leaves the connection usable for the next one.
pub(crate) async fn handle_inbound_frame(
    store: &dyn ChatStore,
    registry: &ChannelRegistry,
    channel_id: i64,
    user_id: i64,
    raw: &str,
) {
    let frame: InboundFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(channel_id, user_id, error = %err, "discarding malformed channel frame");
            metrics::counter!("chat_frames_malformed_total").increment(1);
            return;
        }
    };

    let content = frame.content.trim();
    if content.is_empty() {
        return;
    }

    let message = match store
        .record_message(channel_id, user_id, content.to_string(), frame.parent_id)
        .await
    {
        Ok(Some(message)) => message,
        Ok(None) => {
            warn!(channel_id, user_id, "dropping message from unknown author");
            return;
        }
        Err(err) => {
            // The frame is lost but the connection stays usable.
            error!(channel_id, user_id, error = %err, "failed to persist channel message");
            metrics::counter!("chat_messages_dropped_total").increment(1);
            return;
        }
    };

    registry.broadcast(channel_id, &message).await;
}

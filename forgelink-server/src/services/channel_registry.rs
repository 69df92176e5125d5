//! In-memory registry of live channel connections.
//!
//! One registry instance is constructed per server and threaded through the
//! WebSocket handlers as an [`Extension`](axum::Extension); there is no global
//! state. Each live connection contributes an unbounded sender whose paired
//! receiver is drained into the WebSocket sink by the owning session task.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use shared::models::ChannelMessage;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error};

/// Identifier of one live connection within the registry.
///
/// Distinct from the user id: the same user may hold several simultaneous
/// connections (multiple tabs), each receiving broadcasts independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

type ChannelMembers = HashMap<ConnectionId, mpsc::UnboundedSender<String>>;

/// Per-channel set of live connections with best-effort fan-out.
pub struct ChannelRegistry {
    next_connection_id: AtomicU64,
    channels: Mutex<HashMap<i64, ChannelMembers>>,
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry").finish()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_connection_id: AtomicU64::new(1),
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a connection to a channel's membership set.
    pub async fn register(
        &self,
        channel_id: i64,
        sender: mpsc::UnboundedSender<String>,
    ) -> ConnectionId {
        let connection_id = ConnectionId(self.next_connection_id.fetch_add(1, Ordering::Relaxed));

        let mut channels = self.channels.lock().await;
        channels
            .entry(channel_id)
            .or_default()
            .insert(connection_id, sender);

        connection_id
    }

    /// Removes a connection from a channel's membership set.
    ///
    /// The channel entry itself is dropped once its last connection leaves so
    /// channels with no viewers hold no registry state.
    pub async fn deregister(&self, channel_id: i64, connection_id: ConnectionId) {
        let mut channels = self.channels.lock().await;
        if let Some(members) = channels.get_mut(&channel_id) {
            members.remove(&connection_id);
            if members.is_empty() {
                channels.remove(&channel_id);
            }
        }
    }

    /// Delivers a message to every connection currently registered on the
    /// channel, including the sender's own.
    ///
    /// Membership is snapshotted under the lock and the sends happen outside
    /// it, so a connection that disconnects mid-broadcast cannot corrupt the
    /// iteration. A failed send is counted and logged but never aborts
    /// delivery to the remaining connections and never deregisters the dead
    /// connection; the owning session's disconnect path does that.
    pub async fn broadcast(&self, channel_id: i64, message: &ChannelMessage) {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(err) => {
                error!(channel_id, error = %err, "failed to serialize broadcast payload");
                return;
            }
        };

        let snapshot: Vec<(ConnectionId, mpsc::UnboundedSender<String>)> = {
            let channels = self.channels.lock().await;
            match channels.get(&channel_id) {
                Some(members) => members
                    .iter()
                    .map(|(id, sender)| (*id, sender.clone()))
                    .collect(),
                None => return,
            }
        };

        for (connection_id, sender) in snapshot {
            if sender.send(payload.clone()).is_ok() {
                metrics::counter!("chat_broadcast_deliveries_total").increment(1);
            } else {
                metrics::counter!("chat_broadcast_failures_total").increment(1);
                debug!(channel_id, connection = connection_id.0, "dropped broadcast to closed connection");
            }
        }
    }

    /// Number of live connections currently registered on a channel.
    pub async fn connection_count(&self, channel_id: i64) -> usize {
        let channels = self.channels.lock().await;
        channels.get(&channel_id).map_or(0, HashMap::len)
    }

    /// Number of channels currently holding registry state.
    pub async fn channel_count(&self) -> usize {
        self.channels.lock().await.len()
    }
}

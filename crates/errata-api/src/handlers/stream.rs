//! SSE streaming session handlers
//!
//! Each caller opens `GET /sse` to establish a session. The first
//! event names the endpoint to POST calls to; every completed call is
//! delivered as a `result` event on the session's channel. Sessions
//! are independent: a caller disconnecting drops only its own channel.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use errata_gateway::RpcResponse;

use crate::state::AppState;

/// Per-session result channel capacity. A caller with this many
/// undelivered results has stopped reading its stream; further sends
/// wait rather than growing without bound.
const SESSION_CHANNEL_CAPACITY: usize = 64;

/// Registry of open streaming sessions.
///
/// The lock guards only insert/remove/lookup; it is never held across
/// a dispatch or a send.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, mpsc::Sender<RpcResponse>>>,
}

impl SessionRegistry {
    /// Register a new session and return its result channel receiver
    pub fn register(&self, session_id: &str) -> mpsc::Receiver<RpcResponse> {
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        self.sessions.write().insert(session_id.to_string(), tx);
        rx
    }

    /// Sender for an open session, if it exists
    pub fn sender(&self, session_id: &str) -> Option<mpsc::Sender<RpcResponse>> {
        self.sessions.read().get(session_id).cloned()
    }

    pub fn remove(&self, session_id: &str) {
        self.sessions.write().remove(session_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Deregisters the session when the SSE stream is dropped, whether by
/// clean shutdown or caller disconnect.
struct SessionGuard {
    registry: Arc<SessionRegistry>,
    session_id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        debug!(session_id = %self.session_id, "Streaming session closed");
        self.registry.remove(&self.session_id);
    }
}

/// GET /sse
/// Open a streaming session and return its event channel
pub async fn open_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().to_string();
    let mut rx = state.sessions().register(&session_id);
    let guard = SessionGuard {
        registry: state.sessions().clone(),
        session_id: session_id.clone(),
    };

    info!(session_id = %session_id, "Streaming session opened");

    let stream = async_stream::stream! {
        let _guard = guard;

        yield Ok(Event::default()
            .event("endpoint")
            .data(format!("/rpc/{session_id}")));

        while let Some(response) = rx.recv().await {
            match Event::default().event("result").json_data(&response) {
                Ok(event) => yield Ok(event),
                Err(e) => {
                    tracing::error!(session_id = %session_id, error = %e,
                        "Failed to encode result event");
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

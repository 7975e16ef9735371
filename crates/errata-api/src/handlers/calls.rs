//! Call submission handler for the streaming binding

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use errata_gateway::RpcRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /rpc/{session_id}
///
/// Accepts a call for an open streaming session and returns 202; the
/// result arrives as an SSE event on that session. Each call runs in
/// its own task, so a slow backend call never stalls unrelated calls.
/// If the caller disconnects before the call finishes, the backend
/// call completes and its result is discarded.
pub async fn submit_call(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<RpcRequest>,
) -> Result<StatusCode, ApiError> {
    let Some(tx) = state.sessions().sender(&session_id) else {
        return Err(ApiError::NotFound(format!(
            "no open streaming session '{session_id}'"
        )));
    };

    let dispatcher = state.dispatcher().clone();
    tokio::spawn(async move {
        let response = dispatcher.handle_request(request).await;
        if tx.send(response).await.is_err() {
            debug!(session_id = %session_id, "Caller disconnected; result discarded");
        }
    });

    Ok(StatusCode::ACCEPTED)
}

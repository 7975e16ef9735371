//! errata-api - Transport bindings for the advisory query gateway
//!
//! Two bindings share one [`Dispatcher`](errata_gateway::Dispatcher):
//!
//! - the streaming binding: an axum router where callers open a
//!   long-lived SSE channel (`GET /sse`) and multiplex calls onto it
//!   (`POST /rpc/{session_id}`), with a `/health` liveness probe;
//! - the pipe binding: a JSON Lines request/response loop over
//!   stdin/stdout serving a single caller for the process lifetime.
//!
//! Both translate wire encoding only; outcome semantics live in the
//! dispatcher.
//!
//! # Usage
//!
//! ```ignore
//! use errata_api::{create_router, AppState};
//! use errata_gateway::Dispatcher;
//!
//! let state = AppState::new(Dispatcher::new(backend));
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod pipe;
pub mod state;

pub use error::ApiError;
pub use pipe::{run_pipe, run_stdio};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the streaming-binding router with the given state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Liveness: process-up only, independent of backend or
        // credential health.
        .route("/health", get(|| async { "OK" }))
        // Streaming session: SSE channel carrying call results
        .route("/sse", get(handlers::stream::open_stream))
        // Calls multiplexed onto an open session
        .route("/rpc/{session_id}", post(handlers::calls::submit_call))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

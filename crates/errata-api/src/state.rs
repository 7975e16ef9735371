//! Application state for the streaming binding

use std::sync::Arc;

use errata_gateway::Dispatcher;

use crate::handlers::stream::SessionRegistry;

/// State shared across all handlers.
///
/// The dispatcher is the only business-logic dependency; the session
/// registry is transport plumbing for the SSE binding.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
    sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            sessions: Arc::new(SessionRegistry::default()),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }
}

use std::sync::Arc;

use crate::orchestrator::Orchestrator;
use crate::sessions::SessionStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        let sessions = Arc::clone(orchestrator.sessions());
        Self {
            orchestrator: Arc::new(orchestrator),
            sessions,
        }
    }
}

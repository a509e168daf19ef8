//! GetWorkSessionHandler - Query handler for a single session.

use std::sync::Arc;

use crate::application::handlers::common::load_session;
use crate::domain::foundation::{Actor, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionError};
use crate::ports::WorkSessionRepository;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetWorkSessionQuery {
    pub session_id: WorkSessionId,
    pub actor: Actor,
}

/// Handler for retrieving a session. Owners and supervisors may read it.
pub struct GetWorkSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
}

impl GetWorkSessionHandler {
    pub fn new(repository: Arc<dyn WorkSessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetWorkSessionQuery) -> Result<WorkSession, WorkSessionError> {
        let session = load_session(self.repository.as_ref(), &query.session_id).await?;
        query
            .actor
            .require_owner_or_supervisor(session.worker_id(), "work session")?;
        Ok(session)
    }
}

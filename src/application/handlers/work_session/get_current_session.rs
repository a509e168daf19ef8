//! GetCurrentSessionHandler - Query handler for a worker's in-progress session.

use std::sync::Arc;

use crate::domain::foundation::Actor;
use crate::domain::work_session::{WorkSession, WorkSessionError};
use crate::ports::WorkSessionRepository;

/// Query for the caller's in-progress session.
#[derive(Debug, Clone)]
pub struct GetCurrentSessionQuery {
    pub actor: Actor,
}

pub struct GetCurrentSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
}

impl GetCurrentSessionHandler {
    pub fn new(repository: Arc<dyn WorkSessionRepository>) -> Self {
        Self { repository }
    }

    /// Returns `None` when the worker has nothing in progress. Paused
    /// sessions are not current.
    pub async fn handle(
        &self,
        query: GetCurrentSessionQuery,
    ) -> Result<Option<WorkSession>, WorkSessionError> {
        Ok(self
            .repository
            .get_current_for_worker(&query.actor.user_id)
            .await?)
    }
}

//! ListWorkerSessionsHandler - Query handler for a worker's session history.

use std::sync::Arc;

use crate::domain::foundation::{Actor, UserId};
use crate::domain::work_session::{WorkSession, WorkSessionError};
use crate::ports::WorkSessionRepository;

/// Query for a worker's sessions, newest first.
#[derive(Debug, Clone)]
pub struct ListWorkerSessionsQuery {
    /// Defaults to the caller. Only supervisors may name another worker.
    pub worker_id: Option<UserId>,
    pub include_aborted: bool,
    pub actor: Actor,
}

pub struct ListWorkerSessionsHandler {
    repository: Arc<dyn WorkSessionRepository>,
}

impl ListWorkerSessionsHandler {
    pub fn new(repository: Arc<dyn WorkSessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListWorkerSessionsQuery,
    ) -> Result<Vec<WorkSession>, WorkSessionError> {
        let worker_id = query
            .worker_id
            .unwrap_or_else(|| query.actor.user_id.clone());
        query
            .actor
            .require_owner_or_supervisor(&worker_id, "session history")?;

        Ok(self
            .repository
            .list_by_worker(&worker_id, query.include_aborted)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;

    fn query(worker_id: Option<UserId>, include_aborted: bool, actor: Actor) -> ListWorkerSessionsQuery {
        ListWorkerSessionsQuery {
            worker_id,
            include_aborted,
            actor,
        }
    }

    #[tokio::test]
    async fn hides_aborted_sessions_unless_requested() {
        let h = Harness::new().await;
        h.session_with(|s| s.abort(None).unwrap()).await;
        let live = h.started_session().await;
        let handler = ListWorkerSessionsHandler::new(h.sessions.clone());

        let visible = handler
            .handle(query(None, false, Actor::worker(worker())))
            .await
            .unwrap();
        assert_eq!(visible, vec![live]);

        let all = handler
            .handle(query(None, true, Actor::worker(worker())))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn supervisor_may_list_any_worker() {
        let h = Harness::new().await;
        h.started_session().await;

        let sessions = ListWorkerSessionsHandler::new(h.sessions.clone())
            .handle(query(Some(worker()), false, Actor::supervisor(supervisor())))
            .await
            .unwrap();

        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn worker_cannot_list_colleague() {
        let h = Harness::new().await;

        let err = ListWorkerSessionsHandler::new(h.sessions.clone())
            .handle(query(Some(worker()), false, Actor::worker(other_worker())))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkSessionError::Forbidden(_)));
    }
}

//! CompleteSessionHandler - Command handler for manually completing a session.
//!
//! Sessions normally complete when the last step passes its check. This
//! handler covers the worker finishing early, e.g. when remaining steps
//! were checked outside the app.

use std::sync::Arc;

use crate::application::handlers::common::{load_session, publish};
use crate::domain::foundation::{CommandMetadata, EventId, Timestamp, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionCompleted, WorkSessionError};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Command to complete an in-progress session.
#[derive(Debug, Clone)]
pub struct CompleteSessionCommand {
    pub session_id: WorkSessionId,
}

/// Result of successfully completing a session.
#[derive(Debug, Clone)]
pub struct CompleteSessionResult {
    pub session: WorkSession,
    pub event: WorkSessionCompleted,
}

/// Handler for completing work sessions.
pub struct CompleteSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteSessionHandler {
    pub fn new(
        repository: Arc<dyn WorkSessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteSessionResult, WorkSessionError> {
        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;
        metadata
            .actor
            .require_owner(session.worker_id(), "work session")?;

        session.complete()?;

        let session = self.repository.save(&session).await?;

        let event = WorkSessionCompleted {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            worker_id: session.worker_id().clone(),
            checks_recorded: session.checks().len(),
            completed_at: session.completed_at().copied().unwrap_or_else(Timestamp::now),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            checks_recorded = event.checks_recorded,
            "work session completed"
        );

        Ok(CompleteSessionResult { session, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::work_session::WorkSessionStatus;

    fn handler(h: &Harness) -> CompleteSessionHandler {
        CompleteSessionHandler::new(h.sessions.clone(), h.events.clone())
    }

    #[tokio::test]
    async fn completes_in_progress_session() {
        let h = Harness::new().await;
        let session = h.started_session().await;

        let result = handler(&h)
            .handle(CompleteSessionCommand { session_id: *session.id() }, as_worker())
            .await
            .unwrap();

        assert_eq!(result.session.status(), WorkSessionStatus::Completed);
        assert!(result.session.completed_at().is_some());
        assert!(!result.session.is_locked());
        assert!(h.events.has_event("work_session.completed.v1"));
    }

    #[tokio::test]
    async fn paused_session_must_resume_first() {
        let h = Harness::new().await;
        let session = h.session_with(|s| s.pause().unwrap()).await;

        let err = handler(&h)
            .handle(CompleteSessionCommand { session_id: *session.id() }, as_worker())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkSessionError::InvalidState(_)));
    }

    #[tokio::test]
    async fn locked_session_reports_locked() {
        let h = Harness::new().await;
        let session = h
            .session_with(|s| {
                s.complete().unwrap();
                s.approve(&supervisor()).unwrap();
            })
            .await;

        let err = handler(&h)
            .handle(CompleteSessionCommand { session_id: *session.id() }, as_worker())
            .await
            .unwrap_err();

        assert_eq!(err, WorkSessionError::SessionLocked);
    }

    #[tokio::test]
    async fn supervisor_cannot_complete_for_worker() {
        let h = Harness::new().await;
        let session = h.started_session().await;

        let err = handler(&h)
            .handle(CompleteSessionCommand { session_id: *session.id() }, as_supervisor())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkSessionError::Forbidden(_)));
    }
}

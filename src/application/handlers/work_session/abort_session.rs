//! AbortSessionHandler - Command handler for abandoning a work session.
//!
//! Aborting is terminal but keeps every recorded check; the session stays
//! visible to supervisors as an incomplete run.

use std::sync::Arc;

use crate::application::handlers::common::{load_session, publish};
use crate::domain::foundation::{CommandMetadata, EventId, Timestamp, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionAborted, WorkSessionError};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Command to abort an in-progress or paused session.
#[derive(Debug, Clone)]
pub struct AbortSessionCommand {
    pub session_id: WorkSessionId,
    pub reason: Option<String>,
}

/// Result of successfully aborting a session.
#[derive(Debug, Clone)]
pub struct AbortSessionResult {
    pub session: WorkSession,
    pub event: WorkSessionAborted,
}

/// Handler for aborting work sessions.
pub struct AbortSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AbortSessionHandler {
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
        cmd: AbortSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<AbortSessionResult, WorkSessionError> {
        // 1. Load session
        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;

        // 2. Authorize - only the owning worker
        metadata
            .actor
            .require_owner(session.worker_id(), "work session")?;

        // 3. Abort (blank reasons are dropped)
        let reason = cmd.reason.filter(|r| !r.trim().is_empty());
        session.abort(reason.clone())?;

        // 4. Persist
        let session = self.repository.save(&session).await?;

        // 5. Publish event
        let event = WorkSessionAborted {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            worker_id: session.worker_id().clone(),
            reason,
            checks_recorded: session.checks().len(),
            aborted_at: session.aborted_at().copied().unwrap_or_else(Timestamp::now),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            checks_recorded = event.checks_recorded,
            "work session aborted"
        );

        Ok(AbortSessionResult { session, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::work_session::{CheckResult, CheckSubmission, WorkSessionStatus};

    fn handler(h: &Harness) -> AbortSessionHandler {
        AbortSessionHandler::new(h.sessions.clone(), h.events.clone())
    }

    #[tokio::test]
    async fn abort_keeps_recorded_checks() {
        let h = Harness::new().await;
        let step = h.steps[0];
        let session = h
            .session_with(|s| {
                s.add_check(CheckSubmission::new(step, CheckResult::Fail, "Valve open"))
                    .unwrap();
            })
            .await;

        let result = handler(&h)
            .handle(
                AbortSessionCommand {
                    session_id: *session.id(),
                    reason: Some("Equipment fault".into()),
                },
                as_worker(),
            )
            .await
            .unwrap();

        assert_eq!(result.session.status(), WorkSessionStatus::Aborted);
        assert_eq!(result.session.abort_reason(), Some("Equipment fault"));
        assert_eq!(result.session.checks().len(), 1);
        assert_eq!(result.event.checks_recorded, 1);
        assert!(result.session.aborted_at().is_some());
    }

    #[tokio::test]
    async fn paused_session_can_be_aborted_without_reason() {
        let h = Harness::new().await;
        let session = h.session_with(|s| s.pause().unwrap()).await;

        let result = handler(&h)
            .handle(
                AbortSessionCommand {
                    session_id: *session.id(),
                    reason: Some("   ".into()),
                },
                as_worker(),
            )
            .await
            .unwrap();

        assert_eq!(result.session.status(), WorkSessionStatus::Aborted);
        assert!(result.session.abort_reason().is_none());
    }

    #[tokio::test]
    async fn completed_session_cannot_be_aborted() {
        let h = Harness::new().await;
        let session = h.completed_session().await;

        let err = handler(&h)
            .handle(
                AbortSessionCommand {
                    session_id: *session.id(),
                    reason: None,
                },
                as_worker(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WorkSessionError::invalid_state("Cannot abort a completed session")
        );
    }

    #[tokio::test]
    async fn second_abort_is_refused() {
        let h = Harness::new().await;
        let session = h.session_with(|s| s.abort(None).unwrap()).await;

        let err = handler(&h)
            .handle(
                AbortSessionCommand {
                    session_id: *session.id(),
                    reason: None,
                },
                as_worker(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, WorkSessionError::invalid_state("Session is already aborted"));
    }
}

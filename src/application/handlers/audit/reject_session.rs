//! RejectSessionHandler - Command handler for supervisor rejection.
//!
//! Rejection locks the session. The worker starts a fresh session to redo
//! the procedure.

use std::sync::Arc;

use crate::application::handlers::common::{load_session, publish};
use crate::domain::foundation::{CommandMetadata, EventId, Timestamp, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionError, WorkSessionRejected};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Command to reject a completed session.
#[derive(Debug, Clone)]
pub struct RejectSessionCommand {
    pub session_id: WorkSessionId,
    pub reason: String,
}

/// Result of successfully rejecting a session.
#[derive(Debug, Clone)]
pub struct RejectSessionResult {
    pub session: WorkSession,
    pub event: WorkSessionRejected,
}

/// Handler for rejecting work sessions.
pub struct RejectSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RejectSessionHandler {
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
        cmd: RejectSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<RejectSessionResult, WorkSessionError> {
        metadata.actor.require_supervisor("reject work sessions")?;

        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;

        let supervisor_id = metadata.user_id().clone();
        session.reject(&supervisor_id, &cmd.reason)?;

        let session = self.repository.save(&session).await?;

        let event = WorkSessionRejected {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            rejected_by: supervisor_id,
            reason: cmd.reason,
            rejected_at: Timestamp::now(),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            rejected_by = %event.rejected_by,
            "work session rejected"
        );

        Ok(RejectSessionResult { session, event })
    }
}

//! ResumeSessionHandler - Command handler for resuming a paused session.

use std::sync::Arc;

use crate::application::handlers::common::{load_session, publish};
use crate::domain::foundation::{CommandMetadata, EventId, Timestamp, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionError, WorkSessionResumed};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Command to resume a paused session.
#[derive(Debug, Clone)]
pub struct ResumeSessionCommand {
    pub session_id: WorkSessionId,
}

/// Result of successfully resuming a session.
#[derive(Debug, Clone)]
pub struct ResumeSessionResult {
    pub session: WorkSession,
    pub event: WorkSessionResumed,
}

/// Handler for resuming work sessions.
pub struct ResumeSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ResumeSessionHandler {
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
        cmd: ResumeSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<ResumeSessionResult, WorkSessionError> {
        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;
        metadata
            .actor
            .require_owner(session.worker_id(), "work session")?;

        session.resume()?;

        let session = self.repository.save(&session).await?;

        let event = WorkSessionResumed {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            worker_id: session.worker_id().clone(),
            resumed_at: Timestamp::now(),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(session_id = %cmd.session_id, "work session resumed");

        Ok(ResumeSessionResult { session, event })
    }
}

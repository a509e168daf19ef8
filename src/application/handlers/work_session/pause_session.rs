//! PauseSessionHandler - Command handler for pausing a work session.

use std::sync::Arc;

use crate::application::handlers::common::{load_session, publish};
use crate::domain::foundation::{CommandMetadata, EventId, Timestamp, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionError, WorkSessionPaused};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Command to pause an in-progress session.
#[derive(Debug, Clone)]
pub struct PauseSessionCommand {
    pub session_id: WorkSessionId,
}

/// Result of successfully pausing a session.
#[derive(Debug, Clone)]
pub struct PauseSessionResult {
    pub session: WorkSession,
    pub event: WorkSessionPaused,
}

/// Handler for pausing work sessions.
pub struct PauseSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PauseSessionHandler {
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
        cmd: PauseSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<PauseSessionResult, WorkSessionError> {
        // 1. Load session
        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;

        // 2. Authorize - only the owning worker
        metadata
            .actor
            .require_owner(session.worker_id(), "work session")?;

        // 3. Pause
        session.pause()?;

        // 4. Persist
        let session = self.repository.save(&session).await?;

        // 5. Publish event
        let event = WorkSessionPaused {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            worker_id: session.worker_id().clone(),
            paused_at: session.paused_at().copied().unwrap_or_else(Timestamp::now),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(session_id = %cmd.session_id, "work session paused");

        Ok(PauseSessionResult { session, event })
    }
}

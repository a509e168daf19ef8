//! ApproveSessionHandler - Command handler for supervisor approval.
//!
//! Approval locks the session permanently.

use std::sync::Arc;

use crate::application::handlers::common::{load_session, publish};
use crate::domain::foundation::{CommandMetadata, EventId, Timestamp, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionApproved, WorkSessionError};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Command to approve a completed session.
#[derive(Debug, Clone)]
pub struct ApproveSessionCommand {
    pub session_id: WorkSessionId,
}

/// Result of successfully approving a session.
#[derive(Debug, Clone)]
pub struct ApproveSessionResult {
    pub session: WorkSession,
    pub event: WorkSessionApproved,
}

/// Handler for approving work sessions.
pub struct ApproveSessionHandler {
    repository: Arc<dyn WorkSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ApproveSessionHandler {
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
        cmd: ApproveSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<ApproveSessionResult, WorkSessionError> {
        // 1. Authorize - supervisors only
        metadata.actor.require_supervisor("approve work sessions")?;

        // 2. Load session
        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;

        // 3. Approve and lock
        let supervisor_id = metadata.user_id().clone();
        session.approve(&supervisor_id)?;

        // 4. Persist (a concurrent approval surfaces as a conflict here)
        let session = self.repository.save(&session).await?;

        // 5. Publish event
        let event = WorkSessionApproved {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            approved_by: supervisor_id,
            approved_at: session.approved_at().copied().unwrap_or_else(Timestamp::now),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            approved_by = %event.approved_by,
            "work session approved"
        );

        Ok(ApproveSessionResult { session, event })
    }
}

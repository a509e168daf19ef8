//! OverrideCheckHandler - Command handler for supervisor check overrides.
//!
//! An override rewrites a check's result to `override` and records who did
//! it and why. The evidence fields of the check are never touched.

use std::sync::Arc;

use crate::application::handlers::common::{load_session, publish};
use crate::domain::foundation::{CheckId, CommandMetadata, EventId, Timestamp, WorkSessionId};
use crate::domain::work_session::{
    SafetyCheck, SafetyCheckOverridden, WorkSession, WorkSessionError,
};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Which check to override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideTarget {
    Check(CheckId),
    /// The most recently recorded check.
    Last,
}

/// Command to override a check result.
#[derive(Debug, Clone)]
pub struct OverrideCheckCommand {
    pub session_id: WorkSessionId,
    pub target: OverrideTarget,
    pub reason: String,
}

/// Result of successfully overriding a check.
#[derive(Debug, Clone)]
pub struct OverrideCheckResult {
    pub session: WorkSession,
    pub check: SafetyCheck,
    pub event: SafetyCheckOverridden,
}

/// Handler for overriding safety checks.
pub struct OverrideCheckHandler {
    repository: Arc<dyn WorkSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl OverrideCheckHandler {
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
        cmd: OverrideCheckCommand,
        metadata: CommandMetadata,
    ) -> Result<OverrideCheckResult, WorkSessionError> {
        // 1. Authorize - supervisors only
        metadata.actor.require_supervisor("override safety checks")?;

        // 2. Load session
        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;

        // 3. Override
        let supervisor_id = metadata.user_id().clone();
        let target = match cmd.target {
            OverrideTarget::Check(check_id) => Some(check_id),
            OverrideTarget::Last => session.last_check().map(|c| *c.id()),
        };
        let previous_result = target.and_then(|id| {
            session
                .checks()
                .iter()
                .find(|c| c.id() == &id)
                .map(|c| c.result())
        });
        match cmd.target {
            OverrideTarget::Check(check_id) => {
                session.override_check(&check_id, &cmd.reason, &supervisor_id)?
            }
            OverrideTarget::Last => session.override_last_check(&cmd.reason, &supervisor_id)?,
        }
        let (check_id, previous_result) = target.zip(previous_result).ok_or_else(|| {
            WorkSessionError::infrastructure("Overridden check vanished from session")
        })?;

        // 4. Persist
        let session = self.repository.save(&session).await?;
        let check = session
            .checks()
            .iter()
            .find(|c| c.id() == &check_id)
            .cloned()
            .ok_or_else(|| {
                WorkSessionError::infrastructure(format!("Check {} missing after save", check_id))
            })?;

        // 5. Publish event
        let event = SafetyCheckOverridden {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            check_id,
            previous_result,
            reason: cmd.reason,
            overridden_by: supervisor_id,
            overridden_at: Timestamp::now(),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            check_id = %check_id,
            previous_result = %event.previous_result,
            "safety check overridden"
        );

        Ok(OverrideCheckResult {
            session,
            check,
            event,
        })
    }
}

//! Work session domain events.
//!
//! Events published after a session change has been saved:
//! - `WorkSessionStarted` - Worker began an SOP
//! - `WorkSessionPaused` / `WorkSessionResumed` - Worker stepped away and back
//! - `WorkSessionAborted` - Worker abandoned the session
//! - `WorkSessionCompleted` - All steps done, awaiting review
//! - `WorkSessionApproved` / `WorkSessionRejected` - Supervisor disposition (locks)
//! - `SafetyCheckRecorded` - A check was appended to the audit trail
//! - `SafetyCheckOverridden` - A supervisor overrode a check

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CheckId, EventId, SopId, StepId, Timestamp, UserId, WorkSessionId,
};

use super::CheckResult;

// ════════════════════════════════════════════════════════════════════════════
// Lifecycle
// ════════════════════════════════════════════════════════════════════════════

/// Published when a worker starts a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSessionStarted {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub sop_id: SopId,
    pub worker_id: UserId,
    pub first_step_id: Option<StepId>,
    pub started_at: Timestamp,
}

domain_event!(
    WorkSessionStarted,
    event_type = "work_session.started.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = started_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSessionPaused {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub worker_id: UserId,
    pub paused_at: Timestamp,
}

domain_event!(
    WorkSessionPaused,
    event_type = "work_session.paused.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = paused_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSessionResumed {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub worker_id: UserId,
    pub resumed_at: Timestamp,
}

domain_event!(
    WorkSessionResumed,
    event_type = "work_session.resumed.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = resumed_at,
    event_id = event_id
);

/// Published when a session is abandoned. Recorded checks stay on the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSessionAborted {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub worker_id: UserId,
    pub reason: Option<String>,
    pub checks_recorded: usize,
    pub aborted_at: Timestamp,
}

domain_event!(
    WorkSessionAborted,
    event_type = "work_session.aborted.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = aborted_at,
    event_id = event_id
);

/// Published when the last step is passed or the worker completes manually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSessionCompleted {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub worker_id: UserId,
    pub checks_recorded: usize,
    pub completed_at: Timestamp,
}

domain_event!(
    WorkSessionCompleted,
    event_type = "work_session.completed.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Audit
// ════════════════════════════════════════════════════════════════════════════

/// Published when a supervisor approves a session. The session is locked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSessionApproved {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub approved_by: UserId,
    pub approved_at: Timestamp,
}

domain_event!(
    WorkSessionApproved,
    event_type = "work_session.approved.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = approved_at,
    event_id = event_id
);

/// Published when a supervisor rejects a session. The session is locked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSessionRejected {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub rejected_by: UserId,
    pub reason: String,
    pub rejected_at: Timestamp,
}

domain_event!(
    WorkSessionRejected,
    event_type = "work_session.rejected.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = rejected_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Safety checks
// ════════════════════════════════════════════════════════════════════════════

/// Published when a check is appended to the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyCheckRecorded {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub check_id: CheckId,
    pub step_id: StepId,
    pub result: CheckResult,
    pub confidence_score: Option<f64>,
    pub needs_review: bool,
    /// Step the session moved to, if the check advanced it.
    pub advanced_to: Option<StepId>,
    pub session_completed: bool,
    pub checked_at: Timestamp,
}

domain_event!(
    SafetyCheckRecorded,
    event_type = "work_session.safety_check_recorded.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = checked_at,
    event_id = event_id
);

/// Published when a supervisor overrides a check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyCheckOverridden {
    pub event_id: EventId,
    pub session_id: WorkSessionId,
    pub check_id: CheckId,
    pub previous_result: CheckResult,
    pub reason: String,
    pub overridden_by: UserId,
    pub overridden_at: Timestamp,
}

domain_event!(
    SafetyCheckOverridden,
    event_type = "work_session.safety_check_overridden.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkSession",
    occurred_at = overridden_at,
    event_id = event_id
);

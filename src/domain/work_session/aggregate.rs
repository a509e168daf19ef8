//! WorkSession aggregate - a worker's run through an SOP.
//!
//! The session enforces the lifecycle state machine and owns the ordered
//! list of safety checks that form the compliance audit trail. Once a
//! supervisor approves or rejects a session it is locked and never
//! changes again.
//!
//! # Ownership
//!
//! Sessions reference their SOP by ID only. The SOP is passed in
//! read-only where a step must be resolved.

use serde::{Deserialize, Deserializer, Serialize};

use super::safety_check::{CheckSubmission, SafetyCheck};
use super::status::WorkSessionStatus;
use crate::domain::foundation::{
    require_non_empty, CheckId, DomainError, ErrorCode, SopId, StateMachine, StepId, Timestamp,
    UserId, WorkSessionId,
};
use crate::domain::sop::Sop;

/// Message carried by every operation rejected because the session is locked.
pub const LOCKED_MESSAGE: &str = "Cannot modify a locked session";

/// WorkSession aggregate.
///
/// # Invariants
///
/// - `locked` is true exactly when status is `Approved` or `Rejected`
/// - checks are only ever appended; an existing check changes only by override
/// - a failed operation leaves every field as it was
/// - `completed_at`, `approved_at` and `aborted_at` are written once
///
/// Deserialization refuses a stored session whose fields disagree with its
/// status. See [`WorkSession::check_consistency`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkSession {
    id: WorkSessionId,
    sop_id: SopId,
    worker_id: UserId,
    status: WorkSessionStatus,
    current_step_id: Option<StepId>,
    started_at: Timestamp,
    /// Last time the session was paused. Not cleared on resume.
    paused_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    approved_at: Option<Timestamp>,
    aborted_at: Option<Timestamp>,
    /// Supervisor who approved or rejected the session.
    approved_by: Option<UserId>,
    rejection_reason: Option<String>,
    abort_reason: Option<String>,
    locked: bool,
    checks: Vec<SafetyCheck>,
    /// Optimistic concurrency token, owned by the persistence layer.
    version: u64,
}

impl WorkSession {
    /// Starts a new session on the first step of the SOP.
    ///
    /// # Errors
    ///
    /// - `SopNotStructured` if the SOP has structural defects. Each defect
    ///   message is listed on its own line in the `defects` detail.
    pub fn start(sop: &Sop, worker_id: UserId) -> Result<Self, DomainError> {
        let defects = sop.validate();
        if !defects.is_empty() {
            let listed = defects
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            return Err(DomainError::new(
                ErrorCode::SopNotStructured,
                "SOP is not ready for a work session",
            )
            .with_detail("defects", listed));
        }

        Ok(Self {
            id: WorkSessionId::new(),
            sop_id: *sop.id(),
            worker_id,
            status: WorkSessionStatus::InProgress,
            current_step_id: sop.first_step_id(),
            started_at: Timestamp::now(),
            paused_at: None,
            completed_at: None,
            approved_at: None,
            aborted_at: None,
            approved_by: None,
            rejection_reason: None,
            abort_reason: None,
            locked: false,
            checks: Vec::new(),
            version: 0,
        })
    }

    /// Returns a copy stamped with a storage version. Used by repositories.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &WorkSessionId {
        &self.id
    }

    pub fn sop_id(&self) -> &SopId {
        &self.sop_id
    }

    /// Returns the worker who owns this session.
    pub fn worker_id(&self) -> &UserId {
        &self.worker_id
    }

    pub fn status(&self) -> WorkSessionStatus {
        self.status
    }

    /// The step the worker is on; `None` once every step is done.
    pub fn current_step_id(&self) -> Option<&StepId> {
        self.current_step_id.as_ref()
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn paused_at(&self) -> Option<&Timestamp> {
        self.paused_at.as_ref()
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn approved_at(&self) -> Option<&Timestamp> {
        self.approved_at.as_ref()
    }

    pub fn aborted_at(&self) -> Option<&Timestamp> {
        self.aborted_at.as_ref()
    }

    /// Supervisor who approved, or rejected, the session.
    pub fn approved_by(&self) -> Option<&UserId> {
        self.approved_by.as_ref()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn abort_reason(&self) -> Option<&str> {
        self.abort_reason.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns the audit trail in insertion order.
    pub fn checks(&self) -> &[SafetyCheck] {
        &self.checks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_check(&self) -> Option<&SafetyCheck> {
        self.checks.last()
    }

    /// Checks flagged for supervisor attention and not yet overridden.
    pub fn checks_needing_review(&self) -> impl Iterator<Item = &SafetyCheck> + '_ {
        self.checks
            .iter()
            .filter(|c| c.needs_review() && !c.is_overridden())
    }

    /// Audio URL of the most recent check that has spoken feedback.
    pub fn latest_feedback_audio_url(&self) -> Option<&str> {
        self.checks
            .iter()
            .filter(|c| c.feedback_audio_url().is_some())
            .max_by(|a, b| a.checked_at().cmp(b.checked_at()))
            .and_then(|c| c.feedback_audio_url())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Pauses an in-progress session.
    pub fn pause(&mut self) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        self.status = self.status.transition_to(WorkSessionStatus::Paused)?;
        self.paused_at = Some(Timestamp::now());
        Ok(())
    }

    /// Resumes a paused session. `paused_at` is kept.
    pub fn resume(&mut self) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        self.status = self.status.transition_to(WorkSessionStatus::InProgress)?;
        Ok(())
    }

    /// Abandons the session. Checks recorded so far are kept.
    pub fn abort(&mut self, reason: Option<String>) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        match self.status {
            WorkSessionStatus::Completed
            | WorkSessionStatus::Approved
            | WorkSessionStatus::Rejected => {
                return Err(DomainError::invalid_transition(format!(
                    "Cannot abort a {} session",
                    self.status
                )));
            }
            WorkSessionStatus::Aborted => {
                return Err(DomainError::invalid_transition("Session is already aborted"));
            }
            WorkSessionStatus::InProgress | WorkSessionStatus::Paused => {}
        }
        self.status = self.status.transition_to(WorkSessionStatus::Aborted)?;
        self.aborted_at.get_or_insert_with(Timestamp::now);
        self.abort_reason = reason;
        Ok(())
    }

    /// Appends a safety check. Status is unchanged.
    ///
    /// # Errors
    ///
    /// - `SessionLocked` if the session is locked
    /// - `InvalidStateTransition` unless the session is in progress
    /// - `ValidationFailed` if the submission is malformed
    pub fn add_check(&mut self, submission: CheckSubmission) -> Result<&SafetyCheck, DomainError> {
        self.ensure_not_locked()?;
        self.ensure_in_progress("add checks to")?;
        let check = SafetyCheck::new(submission)?;
        self.checks.push(check);
        Ok(&self.checks[self.checks.len() - 1])
    }

    /// Moves to `next_step_id`, or completes the session when it is `None`.
    pub fn advance_to_next_step(&mut self, next_step_id: Option<StepId>) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        self.ensure_in_progress("advance")?;
        match next_step_id {
            Some(step_id) => {
                self.current_step_id = Some(step_id);
                Ok(())
            }
            None => {
                let completed = self.status.transition_to(WorkSessionStatus::Completed)?;
                self.current_step_id = None;
                self.mark_completed(completed);
                Ok(())
            }
        }
    }

    /// Marks the session completed, ready for supervisor review.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        let completed = self.status.transition_to(WorkSessionStatus::Completed)?;
        self.mark_completed(completed);
        Ok(())
    }

    /// Approves a completed session and locks it.
    pub fn approve(&mut self, supervisor_id: &UserId) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        self.status = self.status.transition_to(WorkSessionStatus::Approved)?;
        self.approved_at.get_or_insert_with(Timestamp::now);
        self.approved_by = Some(supervisor_id.clone());
        self.locked = true;
        Ok(())
    }

    /// Rejects a completed session and locks it.
    ///
    /// `approved_by` records the rejecting supervisor.
    pub fn reject(&mut self, supervisor_id: &UserId, reason: &str) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        let rejected = self.status.transition_to(WorkSessionStatus::Rejected)?;
        if reason.trim().is_empty() {
            return Err(DomainError::validation("reason", "Rejection reason is required"));
        }
        self.status = rejected;
        self.rejection_reason = Some(reason.to_string());
        self.approved_by = Some(supervisor_id.clone());
        self.locked = true;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Overrides
    // ─────────────────────────────────────────────────────────────────────────

    /// Overrides the result of a specific check.
    ///
    /// Allowed in any unlocked status, including paused and aborted.
    pub fn override_check(
        &mut self,
        check_id: &CheckId,
        reason: &str,
        supervisor_id: &UserId,
    ) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        Self::ensure_override_reason(reason)?;
        let check = self
            .checks
            .iter_mut()
            .find(|c| c.id() == check_id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::CheckNotFound,
                    format!("Check {} not found in session", check_id),
                )
                .with_detail("check_id", check_id.to_string())
            })?;
        check.apply_override(reason, supervisor_id);
        Ok(())
    }

    /// Overrides the most recent check.
    pub fn override_last_check(
        &mut self,
        reason: &str,
        supervisor_id: &UserId,
    ) -> Result<(), DomainError> {
        self.ensure_not_locked()?;
        if self.checks.is_empty() {
            return Err(DomainError::new(
                ErrorCode::CheckNotFound,
                "No checks to override",
            ));
        }
        Self::ensure_override_reason(reason)?;
        if let Some(check) = self.checks.last_mut() {
            check.apply_override(reason, supervisor_id);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Guards
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_not_locked(&self) -> Result<(), DomainError> {
        if self.locked {
            return Err(DomainError::new(ErrorCode::SessionLocked, LOCKED_MESSAGE)
                .with_detail("session_id", self.id.to_string()));
        }
        Ok(())
    }

    fn ensure_in_progress(&self, action: &str) -> Result<(), DomainError> {
        let message = match self.status {
            WorkSessionStatus::InProgress => return Ok(()),
            WorkSessionStatus::Paused => format!("Cannot {} a paused session", action),
            WorkSessionStatus::Aborted => format!("Cannot {} an aborted session", action),
            _ => format!("Can only {} in-progress sessions", action),
        };
        Err(DomainError::invalid_transition(message).with_detail("status", self.status.as_str()))
    }

    fn ensure_override_reason(reason: &str) -> Result<(), DomainError> {
        require_non_empty("reason", reason)
            .map(|_| ())
            .map_err(|_| DomainError::validation("reason", "Override reason is required"))
    }

    fn mark_completed(&mut self, status: WorkSessionStatus) {
        self.status = status;
        self.completed_at.get_or_insert_with(Timestamp::now);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stored form
    // ─────────────────────────────────────────────────────────────────────────

    fn from_record(record: WorkSessionRecord) -> Result<Self, DomainError> {
        let session = Self {
            id: record.id,
            sop_id: record.sop_id,
            worker_id: record.worker_id,
            status: record.status,
            current_step_id: record.current_step_id,
            started_at: record.started_at,
            paused_at: record.paused_at,
            completed_at: record.completed_at,
            approved_at: record.approved_at,
            aborted_at: record.aborted_at,
            approved_by: record.approved_by,
            rejection_reason: record.rejection_reason,
            abort_reason: record.abort_reason,
            locked: record.locked,
            checks: record.checks,
            version: record.version,
        };
        session.check_consistency()?;
        Ok(session)
    }

    /// Verifies the fields every reachable state agrees on:
    ///
    /// - `locked` and `approved_by` are set exactly for approved or rejected sessions
    /// - a rejection reason is present, and non-blank, exactly when rejected
    /// - paused, aborted and reviewed sessions carry their timestamps
    fn check_consistency(&self) -> Result<(), DomainError> {
        let inconsistent = |message: String| {
            Err(DomainError::validation("status", message)
                .with_detail("session_id", self.id.to_string()))
        };
        let status = self.status;

        if self.locked != status.is_disposed() {
            return inconsistent(format!(
                "Session with status {} must have locked={}",
                status,
                status.is_disposed()
            ));
        }
        if self.approved_by.is_some() != status.is_disposed() {
            return inconsistent(format!(
                "approved_by must be set exactly when approved or rejected, status is {}",
                status
            ));
        }
        let has_rejection = self
            .rejection_reason
            .as_deref()
            .is_some_and(|reason| !reason.trim().is_empty());
        if self.rejection_reason.is_some() && !has_rejection {
            return inconsistent("Rejection reason cannot be blank".to_string());
        }
        if has_rejection != (status == WorkSessionStatus::Rejected) {
            return inconsistent(format!(
                "rejection_reason must be set exactly when rejected, status is {}",
                status
            ));
        }

        let missing = match status {
            WorkSessionStatus::Paused if self.paused_at.is_none() => Some("paused_at"),
            WorkSessionStatus::Aborted if self.aborted_at.is_none() => Some("aborted_at"),
            WorkSessionStatus::Approved if self.approved_at.is_none() => Some("approved_at"),
            WorkSessionStatus::Completed
            | WorkSessionStatus::Approved
            | WorkSessionStatus::Rejected
                if self.completed_at.is_none() =>
            {
                Some("completed_at")
            }
            _ => None,
        };
        match missing {
            Some(field) => inconsistent(format!(
                "Session with status {} must have {}",
                status, field
            )),
            None => Ok(()),
        }
    }
}

/// Stored form of a session, validated by [`WorkSession::from_record`].
#[derive(Deserialize)]
struct WorkSessionRecord {
    id: WorkSessionId,
    sop_id: SopId,
    worker_id: UserId,
    status: WorkSessionStatus,
    current_step_id: Option<StepId>,
    started_at: Timestamp,
    paused_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    approved_at: Option<Timestamp>,
    aborted_at: Option<Timestamp>,
    approved_by: Option<UserId>,
    rejection_reason: Option<String>,
    abort_reason: Option<String>,
    locked: bool,
    checks: Vec<SafetyCheck>,
    #[serde(default)]
    version: u64,
}

impl<'de> Deserialize<'de> for WorkSession {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = WorkSessionRecord::deserialize(deserializer)?;
        WorkSession::from_record(record).map_err(serde::de::Error::custom)
    }
}

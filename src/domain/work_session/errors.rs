//! Work-session-specific error types returned by the use-case handlers.

use thiserror::Error;

use super::aggregate::LOCKED_MESSAGE;
use crate::domain::foundation::{DomainError, ErrorCode, SopId, StepId, WorkSessionId};

/// Errors surfaced by work session use cases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkSessionError {
    #[error("Work session not found: {0}")]
    NotFound(WorkSessionId),

    #[error("SOP not found: {0}")]
    SopNotFound(SopId),

    #[error("Step {0} is not part of the session's SOP")]
    StepNotFound(StepId),

    #[error("{0}")]
    CheckNotFound(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// A state guard rejected the operation. Carries the guard message.
    #[error("{0}")]
    InvalidState(String),

    #[error("{}", LOCKED_MESSAGE)]
    SessionLocked,

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The SOP has structural defects, one message per defect.
    #[error("SOP is not ready for a work session: {}", .0.join("; "))]
    SopNotStructured(Vec<String>),

    /// An AI or storage call failed or timed out. Nothing was saved.
    #[error("Safety check could not be executed: {0}")]
    CheckExecutionFailed(String),

    /// The session was modified concurrently; reload and retry.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl WorkSessionError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        WorkSessionError::Forbidden(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        WorkSessionError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkSessionError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn check_failed(message: impl Into<String>) -> Self {
        WorkSessionError::CheckExecutionFailed(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        WorkSessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WorkSessionError::NotFound(_) => ErrorCode::WorkSessionNotFound,
            WorkSessionError::SopNotFound(_) => ErrorCode::SopNotFound,
            WorkSessionError::StepNotFound(_) => ErrorCode::StepNotFound,
            WorkSessionError::CheckNotFound(_) => ErrorCode::CheckNotFound,
            WorkSessionError::Forbidden(_) => ErrorCode::Forbidden,
            WorkSessionError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            WorkSessionError::SessionLocked => ErrorCode::SessionLocked,
            WorkSessionError::Validation { .. } => ErrorCode::ValidationFailed,
            WorkSessionError::SopNotStructured(_) => ErrorCode::SopNotStructured,
            WorkSessionError::CheckExecutionFailed(_) => ErrorCode::AIProviderError,
            WorkSessionError::Conflict(_) => ErrorCode::ConcurrencyConflict,
            WorkSessionError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns true if the caller sent a request that can never succeed as-is.
    pub fn is_client_error(&self) -> bool {
        self.code().is_client_error()
    }
}

impl From<DomainError> for WorkSessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionLocked => WorkSessionError::SessionLocked,
            ErrorCode::InvalidStateTransition => WorkSessionError::InvalidState(err.message),
            ErrorCode::ValidationFailed => WorkSessionError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::SopNotStructured => WorkSessionError::SopNotStructured(
                err.details
                    .get("defects")
                    .map(|d| d.lines().map(str::to_string).collect())
                    .unwrap_or_default(),
            ),
            ErrorCode::CheckNotFound => WorkSessionError::CheckNotFound(err.message),
            ErrorCode::Forbidden | ErrorCode::Unauthorized => {
                WorkSessionError::Forbidden(err.message)
            }
            ErrorCode::ConcurrencyConflict => WorkSessionError::Conflict(err.message),
            ErrorCode::AIProviderError | ErrorCode::Timeout => {
                WorkSessionError::CheckExecutionFailed(err.message)
            }
            _ => WorkSessionError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_domain_error_maps_to_session_locked() {
        let err: WorkSessionError =
            DomainError::new(ErrorCode::SessionLocked, LOCKED_MESSAGE).into();
        assert_eq!(err, WorkSessionError::SessionLocked);
        assert_eq!(err.to_string(), "Cannot modify a locked session");
    }

    #[test]
    fn guard_message_survives_conversion() {
        let err: WorkSessionError =
            DomainError::invalid_transition("Cannot add checks to a paused session").into();
        assert_eq!(err.to_string(), "Cannot add checks to a paused session");
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn validation_keeps_field_name() {
        let err: WorkSessionError =
            DomainError::validation("reason", "Rejection reason is required").into();
        assert_eq!(
            err,
            WorkSessionError::validation("reason", "Rejection reason is required")
        );
    }

    #[test]
    fn sop_defects_are_split_per_line() {
        let err: WorkSessionError = DomainError::new(ErrorCode::SopNotStructured, "not ready")
            .with_detail("defects", "SOP must have at least one task\nSOP title is required")
            .into();
        assert_eq!(
            err,
            WorkSessionError::SopNotStructured(vec![
                "SOP must have at least one task".to_string(),
                "SOP title is required".to_string(),
            ])
        );
    }

    #[test]
    fn concurrency_conflict_maps_to_conflict() {
        let err: WorkSessionError =
            DomainError::new(ErrorCode::ConcurrencyConflict, "stale version").into();
        assert!(matches!(err, WorkSessionError::Conflict(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn database_error_is_infrastructure() {
        let err: WorkSessionError = DomainError::new(ErrorCode::DatabaseError, "down").into();
        assert!(matches!(err, WorkSessionError::Infrastructure(_)));
        assert!(!err.is_client_error());
    }
}

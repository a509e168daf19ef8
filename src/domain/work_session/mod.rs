//! Work session domain module.
//!
//! A work session tracks one worker's progress through an SOP, enforces the
//! lifecycle state machine and keeps the append-only audit trail of safety
//! checks. Approval or rejection locks the session permanently.
//!
//! # Events
//!
//! - `WorkSessionStarted`, `WorkSessionPaused`, `WorkSessionResumed`
//! - `WorkSessionAborted`, `WorkSessionCompleted`
//! - `WorkSessionApproved`, `WorkSessionRejected`
//! - `SafetyCheckRecorded`, `SafetyCheckOverridden`

mod aggregate;
mod errors;
mod events;
mod safety_check;
mod status;

#[cfg(test)]
mod properties;

pub use aggregate::{WorkSession, LOCKED_MESSAGE};
pub use errors::WorkSessionError;
pub use events::{
    SafetyCheckOverridden, SafetyCheckRecorded, WorkSessionAborted, WorkSessionApproved,
    WorkSessionCompleted, WorkSessionPaused, WorkSessionRejected, WorkSessionResumed,
    WorkSessionStarted,
};
pub use safety_check::{CheckOverride, CheckResult, CheckSubmission, SafetyCheck};
pub use status::WorkSessionStatus;

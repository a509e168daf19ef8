//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `work_session` - Worker lifecycle: start, pause, resume, abort, complete
//! - `safety_check` - AI-verified "ヨシッ!" checks
//! - `audit` - Supervisor approval, rejection and overrides

mod common;
#[cfg(test)]
pub(crate) mod test_support;

pub mod audit;
pub mod safety_check;
pub mod work_session;

pub use audit::{
    ApproveSessionCommand, ApproveSessionHandler, ApproveSessionResult, ListPendingReviewHandler,
    ListPendingReviewQuery, OverrideCheckCommand, OverrideCheckHandler, OverrideCheckResult,
    OverrideTarget, PendingReview, RejectSessionCommand, RejectSessionHandler, RejectSessionResult,
};
pub use safety_check::{
    CheckServices, CheckSettings, ExecuteCheckCommand, ExecuteCheckHandler, ExecuteCheckResult,
    SpokenConfirmation,
};
pub use work_session::{
    AbortSessionCommand, AbortSessionHandler, AbortSessionResult, CompleteSessionCommand,
    CompleteSessionHandler, CompleteSessionResult, GetCurrentSessionHandler,
    GetCurrentSessionQuery, GetWorkSessionHandler, GetWorkSessionQuery, ListWorkerSessionsHandler,
    ListWorkerSessionsQuery, PauseSessionCommand, PauseSessionHandler, PauseSessionResult,
    ResumeSessionCommand, ResumeSessionHandler, ResumeSessionResult, StartSessionCommand,
    StartSessionHandler, StartSessionResult,
};

//! Supervisor review handlers: approval, rejection and check overrides.

mod approve_session;
mod list_pending_review;
mod override_check;
mod reject_session;

pub use approve_session::{ApproveSessionCommand, ApproveSessionHandler, ApproveSessionResult};
pub use list_pending_review::{ListPendingReviewHandler, ListPendingReviewQuery, PendingReview};
pub use override_check::{
    OverrideCheckCommand, OverrideCheckHandler, OverrideCheckResult, OverrideTarget,
};
pub use reject_session::{RejectSessionCommand, RejectSessionHandler, RejectSessionResult};

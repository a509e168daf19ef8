//! Work session repository port.
//!
//! # Concurrency
//!
//! Every `WorkSession` carries a version token. `save` succeeds only when
//! the session's version matches the stored one (or the session is new),
//! and returns the stored copy with the version incremented. Two writers
//! that loaded the same version cannot both win.
//!
//! A worker has at most one in-progress session. Saving a new in-progress
//! session while another is stored for the same worker is rejected, so two
//! racing starts cannot both succeed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId, WorkSessionId};
use crate::domain::work_session::WorkSession;

/// Repository port for WorkSession aggregate persistence.
#[async_trait]
pub trait WorkSessionRepository: Send + Sync {
    /// Insert or update a session.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the stored version differs from `session.version()`,
    ///   or a new in-progress session meets the worker's existing one
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &WorkSession) -> Result<WorkSession, DomainError>;

    /// Find a session by its ID.
    async fn get_by_id(&self, id: &WorkSessionId) -> Result<Option<WorkSession>, DomainError>;

    /// The worker's most recently started in-progress session.
    async fn get_current_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Option<WorkSession>, DomainError>;

    /// All sessions for a worker, newest first.
    ///
    /// Aborted sessions are skipped unless `include_aborted` is set.
    async fn list_by_worker(
        &self,
        worker_id: &UserId,
        include_aborted: bool,
    ) -> Result<Vec<WorkSession>, DomainError>;

    /// Completed sessions awaiting a supervisor, oldest completion first.
    async fn list_pending_review(&self) -> Result<Vec<WorkSession>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WorkSessionRepository) {}
    }
}

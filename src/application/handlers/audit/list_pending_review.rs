//! ListPendingReviewHandler - Query handler for the supervisor review queue.

use std::sync::Arc;

use crate::domain::foundation::{Actor, CheckId};
use crate::domain::work_session::{WorkSession, WorkSessionError};
use crate::ports::WorkSessionRepository;

/// Query for completed sessions awaiting approval or rejection.
#[derive(Debug, Clone)]
pub struct ListPendingReviewQuery {
    pub actor: Actor,
}

/// A session in the review queue, with the checks the judge was unsure of.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReview {
    pub session: WorkSession,
    pub flagged_checks: Vec<CheckId>,
}

pub struct ListPendingReviewHandler {
    repository: Arc<dyn WorkSessionRepository>,
}

impl ListPendingReviewHandler {
    pub fn new(repository: Arc<dyn WorkSessionRepository>) -> Self {
        Self { repository }
    }

    /// Oldest completion first.
    pub async fn handle(
        &self,
        query: ListPendingReviewQuery,
    ) -> Result<Vec<PendingReview>, WorkSessionError> {
        query.actor.require_supervisor("view the review queue")?;

        let sessions = self.repository.list_pending_review().await?;
        Ok(sessions
            .into_iter()
            .map(|session| PendingReview {
                flagged_checks: session.checks_needing_review().map(|c| *c.id()).collect(),
                session,
            })
            .collect())
    }
}

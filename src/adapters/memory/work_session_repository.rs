//! In-memory WorkSession repository with optimistic versioning.
//!
//! Used by tests and local runs. The version check happens under the write
//! lock, so of two saves built from the same loaded version exactly one wins.
//! The same lock holds the one-in-progress-session-per-worker rule for new
//! sessions, standing in for a partial unique index.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId, WorkSessionId};
use crate::domain::work_session::{WorkSession, WorkSessionStatus};
use crate::ports::WorkSessionRepository;

/// In-memory work session store.
#[derive(Default)]
pub struct InMemoryWorkSessionRepository {
    sessions: RwLock<HashMap<WorkSessionId, WorkSession>>,
}

impl InMemoryWorkSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl WorkSessionRepository for InMemoryWorkSessionRepository {
    async fn save(&self, session: &WorkSession) -> Result<WorkSession, DomainError> {
        let mut sessions = self.sessions.write().await;

        let stored_version = sessions.get(session.id()).map(|s| s.version());
        match stored_version {
            Some(v) if v != session.version() => {
                return Err(DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!(
                        "Work session {} was modified concurrently (expected version {}, found {})",
                        session.id(),
                        session.version(),
                        v
                    ),
                ));
            }
            None if session.version() != 0 => {
                return Err(DomainError::new(
                    ErrorCode::WorkSessionNotFound,
                    format!("Work session {} no longer exists", session.id()),
                ));
            }
            None if session.status() == WorkSessionStatus::InProgress => {
                let active = sessions.values().find(|s| {
                    s.worker_id() == session.worker_id()
                        && s.status() == WorkSessionStatus::InProgress
                });
                if let Some(active) = active {
                    return Err(DomainError::new(
                        ErrorCode::ConcurrencyConflict,
                        format!(
                            "Worker {} already has an active session: {}",
                            session.worker_id(),
                            active.id()
                        ),
                    ));
                }
            }
            _ => {}
        }

        let stored = session.clone().with_version(session.version() + 1);
        sessions.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: &WorkSessionId) -> Result<Option<WorkSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn get_current_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Option<WorkSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.worker_id() == worker_id && s.status() == WorkSessionStatus::InProgress)
            .max_by(|a, b| a.started_at().cmp(b.started_at()))
            .cloned())
    }

    async fn list_by_worker(
        &self,
        worker_id: &UserId,
        include_aborted: bool,
    ) -> Result<Vec<WorkSession>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut found: Vec<WorkSession> = sessions
            .values()
            .filter(|s| s.worker_id() == worker_id)
            .filter(|s| include_aborted || s.status() != WorkSessionStatus::Aborted)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.started_at().cmp(a.started_at()));
        Ok(found)
    }

    async fn list_pending_review(&self) -> Result<Vec<WorkSession>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut pending: Vec<WorkSession> = sessions
            .values()
            .filter(|s| s.status() == WorkSessionStatus::Completed)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.completed_at().cmp(&b.completed_at()));
        Ok(pending)
    }
}

//! Command infrastructure for use-case handlers.
//!
//! Every handler accepts a single `CommandMetadata` alongside its command
//! instead of loose `actor` and `correlation_id` parameters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Actor, UserId};

/// Metadata context for command handlers.
///
/// Carries the authenticated actor plus correlation context through the
/// handler and into emitted events.
///
/// # Example
///
/// ```ignore
/// let metadata = CommandMetadata::new(Actor::worker(worker_id))
///     .with_correlation_id(request_id);
/// handler.handle(PauseSessionCommand { session_id }, metadata).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The caller executing this command (required for authorization).
    pub actor: Actor,

    /// Links related operations across a single user request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for the given actor.
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            correlation_id: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the acting user's ID.
    pub fn user_id(&self) -> &UserId {
        &self.actor.user_id
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> Actor {
        Actor::worker(UserId::new("worker-1").unwrap())
    }

    #[test]
    fn new_creates_with_actor() {
        let metadata = CommandMetadata::new(worker());
        assert_eq!(metadata.user_id().as_str(), "worker-1");
    }

    #[test]
    fn correlation_id_returns_set_value() {
        let metadata = CommandMetadata::new(worker()).with_correlation_id("req-42");
        assert_eq!(metadata.correlation_id(), "req-42");
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        let metadata = CommandMetadata::new(worker());
        assert!(!metadata.correlation_id().is_empty());
    }
}

//! Steps shared by every work session handler: load, publish, bound.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{
    CommandMetadata, EventEnvelope, SerializableDomainEvent, WorkSessionId,
};
use crate::domain::work_session::{WorkSession, WorkSessionError};
use crate::ports::{EventPublisher, WorkSessionRepository};

/// Loads a session or fails with `NotFound`.
pub(crate) async fn load_session(
    repository: &dyn WorkSessionRepository,
    session_id: &WorkSessionId,
) -> Result<WorkSession, WorkSessionError> {
    repository
        .get_by_id(session_id)
        .await?
        .ok_or(WorkSessionError::NotFound(*session_id))
}

/// Wraps an event in an envelope carrying the command's correlation context.
pub(crate) fn envelope<E: SerializableDomainEvent>(
    event: &E,
    metadata: &CommandMetadata,
) -> Result<EventEnvelope, WorkSessionError> {
    Ok(event
        .to_envelope()?
        .with_correlation_id(metadata.correlation_id())
        .with_user_id(metadata.user_id().to_string()))
}

/// Publishes a single event for a change that has already been saved.
pub(crate) async fn publish<E: SerializableDomainEvent>(
    publisher: &dyn EventPublisher,
    event: &E,
    metadata: &CommandMetadata,
) -> Result<(), WorkSessionError> {
    publisher.publish(envelope(event, metadata)?).await?;
    Ok(())
}

/// Runs an external call under a deadline.
///
/// Both a timeout and a call error become `CheckExecutionFailed`, naming
/// the stage that failed.
pub(crate) async fn bounded<T, E, F>(
    stage: &str,
    limit: Duration,
    call: F,
) -> Result<T, WorkSessionError>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(WorkSessionError::check_failed(format!("{} failed: {}", stage, e))),
        Err(_) => Err(WorkSessionError::check_failed(format!(
            "{} timed out after {}s",
            stage,
            limit.as_secs_f64()
        ))),
    }
}

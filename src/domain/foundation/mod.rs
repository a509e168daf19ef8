//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and event plumbing
//! that form the vocabulary of the safety-verification domain.

mod authorization;
mod command;
mod errors;
mod events;
mod ids;
mod state_machine;
mod text;
mod timestamp;

pub use authorization::{Actor, Role};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{CheckId, HazardId, SopId, StepId, TaskId, UserId, WorkSessionId};
pub use state_machine::StateMachine;
pub use text::{is_blank, require_non_empty};
pub use timestamp::Timestamp;

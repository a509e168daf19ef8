//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `SopRepository` - SOP lookup
//! - `WorkSessionRepository` - Versioned work session persistence
//!
//! ## AI collaborators
//!
//! - `SafetyJudge` - Multimodal step verification
//! - `SpeechToText` / `TextToSpeech` - Spoken confirmation and feedback
//!
//! ## Infrastructure
//!
//! - `FeedbackAudioStore` - Storage for synthesized feedback clips
//! - `EventPublisher` - Domain event publication

mod ai_error;
mod event_publisher;
mod feedback_audio_store;
mod media;
mod safety_judge;
mod sop_repository;
mod speech;
mod work_session_repository;

pub use ai_error::AIError;
pub use event_publisher::EventPublisher;
pub use feedback_audio_store::{AudioKind, FeedbackAudioStore, StorageError};
pub use media::MediaPayload;
pub use safety_judge::{verdict_schema, JudgeRequest, JudgeVerdict, SafetyJudge, Verdict};
pub use sop_repository::SopRepository;
pub use speech::{SpeechToText, TextToSpeech};
pub use work_session_repository::WorkSessionRepository;

//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory repositories with optimistic versioning
//! - `events` - In-memory event bus
//! - `storage` - Filesystem feedback audio store
//! - `ai` - Scripted AI judge and speech collaborators

pub mod ai;
pub mod events;
pub mod memory;
pub mod storage;

pub use ai::{MockSafetyJudge, MockSpeechToText, MockTextToSpeech};
pub use events::InMemoryEventBus;
pub use memory::{InMemorySopRepository, InMemoryWorkSessionRepository};
pub use storage::LocalFeedbackAudioStore;

//! FeedbackAudioStore port - persistence for synthesized speech.
//!
//! Stored clips are addressed by an opaque URL that the serving layer
//! resolves back through [`FeedbackAudioStore::load`].

use async_trait::async_trait;

use crate::domain::foundation::WorkSessionId;

/// Which clip of a session is being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    /// Greeting played when a session starts. One per session.
    Welcome,
    /// Spoken verdict for a safety check.
    Feedback,
}

/// Errors that can occur during audio storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Audio not found: {0}")]
    NotFound(String),
    #[error("Invalid audio URL: {0}")]
    InvalidPath(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Port for storing feedback audio.
#[async_trait]
pub trait FeedbackAudioStore: Send + Sync {
    /// Store a clip and return the URL it is served under.
    async fn store(
        &self,
        session_id: &WorkSessionId,
        kind: AudioKind,
        audio: &[u8],
    ) -> Result<String, StorageError>;

    /// Read a clip back by the URL returned from `store`.
    async fn load(&self, url: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove a clip no check refers to. Deleting a missing clip succeeds.
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_audio_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn FeedbackAudioStore) {}
    }
}

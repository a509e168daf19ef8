//! Speech ports - transcription of spoken confirmations and synthesis of feedback.

use async_trait::async_trait;

use super::{AIError, MediaPayload};

/// Port for speech-to-text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a recording in the given language (ISO 639-1, e.g. "ja").
    async fn transcribe(&self, audio: &MediaPayload, language: &str) -> Result<String, AIError>;
}

/// Port for text-to-speech.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize spoken audio (MP3) for the text.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AIError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_ports_are_object_safe() {
        fn _stt(_p: &dyn SpeechToText) {}
        fn _tts(_p: &dyn TextToSpeech) {}
    }
}

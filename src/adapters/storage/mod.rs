//! Storage adapters.

mod local_feedback_audio_store;

pub use local_feedback_audio_store::LocalFeedbackAudioStore;

//! AI judge and transcription configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::CheckSettings;

/// Multimodal judge and speech-to-text configuration
#[derive(Debug, Deserialize)]
pub struct AiConfig {
    /// API key shared by the judge and transcription endpoints
    pub api_key: Option<SecretString>,

    /// Chat completions endpoint of the vision model
    #[serde(default = "default_judge_endpoint")]
    pub judge_endpoint: String,

    /// Vision model used to judge evidence
    #[serde(default = "default_judge_model")]
    pub judge_model: String,

    /// Transcription endpoint
    #[serde(default = "default_whisper_endpoint")]
    pub whisper_endpoint: String,

    /// Transcription model
    #[serde(default = "default_whisper_model")]
    pub whisper_model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Verdicts below this confidence are flagged for review
    #[serde(default = "default_threshold")]
    pub review_confidence_threshold: f64,

    /// ISO 639-1 language of spoken confirmations
    #[serde(default = "default_language")]
    pub transcription_language: String,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Settings handed to the check execution handler
    pub fn check_settings(&self) -> CheckSettings {
        CheckSettings {
            call_timeout: self.timeout(),
            review_confidence_threshold: self.review_confidence_threshold,
            transcription_language: self.transcription_language.clone(),
        }
    }

    /// Validate AI configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=1.0).contains(&self.review_confidence_threshold) {
            return Err(ValidationError::InvalidConfidenceThreshold(
                self.review_confidence_threshold,
            ));
        }
        let language = self.transcription_language.as_str();
        if language.len() != 2 || !language.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidLanguage);
        }
        for endpoint in [&self.judge_endpoint, &self.whisper_endpoint] {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(ValidationError::InvalidEndpoint(endpoint.clone()));
            }
        }
        if production && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            judge_endpoint: default_judge_endpoint(),
            judge_model: default_judge_model(),
            whisper_endpoint: default_whisper_endpoint(),
            whisper_model: default_whisper_model(),
            timeout_secs: default_timeout(),
            review_confidence_threshold: default_threshold(),
            transcription_language: default_language(),
        }
    }
}

fn default_judge_endpoint() -> String {
    "https://api.sambanova.ai/v1/chat/completions".to_string()
}

fn default_judge_model() -> String {
    "Llama-4-Maverick-17B-128E-Instruct".to_string()
}

fn default_whisper_endpoint() -> String {
    "https://api.sambanova.ai/v1/audio/transcriptions".to_string()
}

fn default_whisper_model() -> String {
    "Whisper-Large-v3".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_threshold() -> f64 {
    0.7
}

fn default_language() -> String {
    "ja".to_string()
}

//! Text-to-speech configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Text-to-speech provider configuration
#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    /// TTS API key
    pub api_key: Option<SecretString>,

    /// TTS inference endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Voice used for welcome and feedback clips
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Generate a spoken welcome when a session starts
    #[serde(default = "default_welcome_audio")]
    pub welcome_audio: bool,
}

impl SpeechConfig {
    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate speech configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(ValidationError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.voice.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SPEECH__VOICE"));
        }
        if production && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("SPEECH__API_KEY"));
        }
        Ok(())
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            voice: default_voice(),
            welcome_audio: default_welcome_audio(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.hume.ai/v0/tts/inference".to_string()
}

fn default_voice() -> String {
    "e5c30713-861d-476e-883a-fc0e1788f736".to_string()
}

fn default_welcome_audio() -> bool {
    true
}

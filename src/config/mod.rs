//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `YOSHIKOSAN_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use yoshikosan::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let settings = config.ai.check_settings();
//! ```

mod ai;
mod error;
mod server;
mod speech;
mod storage;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};
pub use speech::SpeechConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads a working
/// development configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Environment and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// Vision judge and transcription
    #[serde(default)]
    pub ai: AiConfig,

    /// Text-to-speech
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Feedback audio storage
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `YOSHIKOSAN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `YOSHIKOSAN__AI__TIMEOUT_SECS=30` -> `ai.timeout_secs = 30`
    /// - `YOSHIKOSAN__STORAGE__AUDIO_DIR=/var/audio` -> `storage.audio_dir = /var/audio`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("YOSHIKOSAN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// API keys are only required in production; development runs may
    /// wire the scripted AI adapters instead.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let production = self.is_production();
        self.server.validate()?;
        self.ai.validate(production)?;
        self.speech.validate(production)?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "YOSHIKOSAN__SERVER__ENVIRONMENT",
        "YOSHIKOSAN__SERVER__LOG_FORMAT",
        "YOSHIKOSAN__AI__API_KEY",
        "YOSHIKOSAN__AI__TIMEOUT_SECS",
        "YOSHIKOSAN__AI__REVIEW_CONFIDENCE_THRESHOLD",
        "YOSHIKOSAN__SPEECH__API_KEY",
        "YOSHIKOSAN__STORAGE__AUDIO_DIR",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.ai.timeout_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("YOSHIKOSAN__AI__TIMEOUT_SECS", "20");
        env::set_var("YOSHIKOSAN__AI__REVIEW_CONFIDENCE_THRESHOLD", "0.85");
        env::set_var("YOSHIKOSAN__SERVER__LOG_FORMAT", "json");
        env::set_var("YOSHIKOSAN__STORAGE__AUDIO_DIR", "/var/lib/yoshikosan/audio");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.timeout_secs, 20);
        assert_eq!(config.ai.review_confidence_threshold, 0.85);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(
            config.storage.audio_dir,
            std::path::PathBuf::from("/var/lib/yoshikosan/audio")
        );
    }

    #[test]
    fn test_production_requires_keys() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("YOSHIKOSAN__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_with_keys_is_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("YOSHIKOSAN__SERVER__ENVIRONMENT", "production");
        env::set_var("YOSHIKOSAN__AI__API_KEY", "sn-xxx");
        env::set_var("YOSHIKOSAN__SPEECH__API_KEY", "hume-xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }
}

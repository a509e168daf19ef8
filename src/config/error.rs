//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("AI call timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Review confidence threshold must be within [0, 1], got {0}")]
    InvalidConfidenceThreshold(f64),

    #[error("Transcription language must be a two-letter ISO 639-1 code")]
    InvalidLanguage,

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Audio URL prefix must start with '/' or 'http'")]
    InvalidUrlPrefix,
}

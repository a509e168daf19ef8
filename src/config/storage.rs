//! Feedback audio storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where synthesized clips are written and how they are addressed
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per session
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// Public URL prefix the clips are served under
    #[serde(default = "default_url_prefix")]
    pub audio_url_prefix: String,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.audio_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__AUDIO_DIR"));
        }
        if !self.audio_url_prefix.starts_with('/') && !self.audio_url_prefix.starts_with("http") {
            return Err(ValidationError::InvalidUrlPrefix);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            audio_url_prefix: default_url_prefix(),
        }
    }
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("./data/audio")
}

fn default_url_prefix() -> String {
    "/api/v1/audio".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.audio_dir, PathBuf::from("./data/audio"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_prefix_is_rejected() {
        let config = StorageConfig {
            audio_url_prefix: "audio".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUrlPrefix));
    }
}

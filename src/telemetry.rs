//! Tracing subscriber setup.
//!
//! Handlers and adapters log through `tracing` macros; the embedding
//! process calls [`init_tracing`] once at startup.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServerConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Builds the filter, preferring `RUST_LOG` over the configured level.
pub fn env_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(log_level).map_err(|e| TelemetryError::InvalidFilter {
        directive: log_level.to_string(),
        message: e.to_string(),
    })
}

/// Installs the global subscriber in the configured format.
///
/// # Errors
///
/// - `InvalidFilter` if `log_level` is not a valid filter directive
/// - `AlreadyInstalled` if a global subscriber was set earlier
pub fn init_tracing(server: &ServerConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(&server.log_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match server.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init(),
    };
    installed.map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))
}

//! Errors shared by the AI collaborator ports (judge, speech-to-text, text-to-speech).

use std::time::Duration;

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unreachable or returned a server error.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The response did not match the requested schema.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout {
            timeout_secs: after.as_secs(),
        }
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Unavailable { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_reports_whole_seconds() {
        let err = AIError::timeout(Duration::from_millis(60_500));
        assert_eq!(err.to_string(), "request timed out after 60s");
    }

    #[test]
    fn retryable_classification() {
        assert!(AIError::rate_limited(5).is_retryable());
        assert!(AIError::unavailable("502").is_retryable());
        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::invalid_response("missing result").is_retryable());
    }
}

//! Generator failures

use std::time::Duration;

/// Why a generation attempt produced no usable text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    /// Account out of quota or billing inactive; eligible for fallback content
    #[error("generation quota exhausted: {0}")]
    QuotaExceeded(String),

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// No answer within the configured bound
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// Request never completed (DNS, TLS, connection reset, bad body)
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream answered but with no content
    #[error("empty response from generator")]
    EmptyResponse,

    /// Completion could not be turned into the expected artifact shape
    #[error("malformed output: {0}")]
    MalformedOutput(String),

    /// Backend missing credentials or endpoint
    #[error("generator not configured: {0}")]
    NotConfigured(String),
}

impl GeneratorError {
    /// Check if fallback content may be substituted
    #[inline]
    #[must_use]
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }

    /// Check if a later attempt might succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Transport(_) | Self::EmptyResponse
        ) || matches!(self, Self::Upstream { status, .. } if *status >= 500 || *status == 429)
    }
}

impl From<reqwest::Error> for GeneratorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

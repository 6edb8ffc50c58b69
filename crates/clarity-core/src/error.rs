//! Error types for Clarity Core
//!
//! Every failure leaving the core is a [`ClarityError`] with a stable
//! [`ErrorKind`]. The boundary turns it into an [`ErrorPayload`]; nothing
//! panics across it.

use clarity_generation::GeneratorError;
use clarity_model::ModelError;
use clarity_store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result alias for core operations
pub type ClarityResult<T> = Result<T, ClarityError>;

/// Main Clarity error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClarityError {
    /// Caller supplied an unknown step, malformed id or empty name
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record, for example `idea`
        entity: &'static str,
        /// Identifier as given
        id: String,
    },

    /// Store unreachable, or a conflict persisted after one re-read
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Generator failed, timed out or returned unusable output
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

impl ClarityError {
    /// Create invalid-argument error
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create not-found error
    #[inline]
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create storage error
    #[inline]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Stable classification
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            Self::GenerationFailed(_) => ErrorKind::GenerationFailed,
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<ModelError> for ClarityError {
    fn from(err: ModelError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<StoreError> for ClarityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Conflict { .. } | StoreError::Unavailable(_) => {
                Self::StorageUnavailable(err.to_string())
            }
        }
    }
}

impl From<GeneratorError> for ClarityError {
    fn from(err: GeneratorError) -> Self {
        Self::GenerationFailed(err.to_string())
    }
}

/// Stable error classification exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input (400)
    InvalidArgument,
    /// Missing entity (404)
    NotFound,
    /// Retryable storage failure (503)
    StorageUnavailable,
    /// Upstream generation failure (502)
    GenerationFailed,
}

impl ErrorKind {
    /// Stable snake_case code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::StorageUnavailable => "storage_unavailable",
            Self::GenerationFailed => "generation_failed",
        }
    }

    /// HTTP-equivalent status
    #[must_use]
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::InvalidArgument => 400,
            Self::NotFound => 404,
            Self::StorageUnavailable => 503,
            Self::GenerationFailed => 502,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Failure body returned by the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Always `false`
    pub success: bool,
    /// Classification
    pub kind: ErrorKind,
    /// Human-readable detail
    pub message: String,
}

impl ErrorPayload {
    /// HTTP-equivalent status
    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.kind.status_hint()
    }
}

impl From<ClarityError> for ErrorPayload {
    fn from(err: ClarityError) -> Self {
        Self {
            success: false,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

//! Validation errors raised while constructing typed records from raw input

/// Raised when raw input cannot become a typed record or identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// User identifier was empty or blank
    #[error("user id must not be empty")]
    EmptyUserId,

    /// Idea identifier was not a UUID
    #[error("invalid idea id '{value}': expected a UUID")]
    InvalidIdeaId {
        /// Rejected input
        value: String,
    },

    /// Step outside the five validation steps
    #[error("invalid step '{value}': expected one of landing, tweet, competitor, discussion, survey")]
    InvalidStep {
        /// Rejected input
        value: String,
    },

    /// Artifact type outside the supported set
    #[error("invalid artifact type '{value}'")]
    InvalidArtifactKind {
        /// Rejected input
        value: String,
    },

    /// Roadmap step name was empty or blank
    #[error("roadmap step name must not be empty")]
    EmptyStepName,
}

impl ModelError {
    /// Create invalid idea id error
    pub fn invalid_idea_id(value: impl Into<String>) -> Self {
        Self::InvalidIdeaId {
            value: value.into(),
        }
    }

    /// Create invalid step error
    pub fn invalid_step(value: impl Into<String>) -> Self {
        Self::InvalidStep {
            value: value.into(),
        }
    }
}

//! The generation seam

use crate::error::GeneratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Optional system instruction
    pub system: Option<String>,
    /// User prompt
    pub prompt: String,
    /// Completion length bound
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationRequest {
    /// Create request with default sampling
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: 256,
            temperature: 0.7,
        }
    }

    /// With system instruction
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// With completion length bound
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// With sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text-generation backend
///
/// Implementations return raw completion text. Quota exhaustion must be
/// reported as [`GeneratorError::QuotaExceeded`]; callers rely on the variant,
/// not on the message.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce a completion for `request`
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError>;

    /// Tag recorded as the provenance of generated artifacts
    fn backend_tag(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let req = GenerationRequest::new("hello")
            .with_system("be brief")
            .with_max_tokens(100)
            .with_temperature(0.8);
        assert_eq!(req.system.as_deref(), Some("be brief"));
        assert_eq!(req.max_tokens, 100);
        assert!((req.temperature - 0.8).abs() < f32::EPSILON);
    }
}

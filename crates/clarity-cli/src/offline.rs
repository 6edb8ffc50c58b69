//! Generator used when no backend key is configured

use async_trait::async_trait;
use clarity_generation::{GenerationRequest, GeneratorError, TextGenerator};

/// Reports exhausted quota for every request, so callers get sample content
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GeneratorError> {
        Err(GeneratorError::QuotaExceeded("offline mode".to_string()))
    }

    fn backend_tag(&self) -> &str {
        "offline"
    }
}

//! OpenAI-compatible chat-completions client
//!
//! Works against any endpoint speaking the `/chat/completions` protocol.
//! Failures are classified from the status code and the structured `error`
//! object of the response body:
//!
//! | Condition                                             | Result                 |
//! |-------------------------------------------------------|------------------------|
//! | HTTP 402                                              | `QuotaExceeded`        |
//! | `error.code`/`error.type` is a quota or billing code  | `QuotaExceeded`        |
//! | any other non-2xx                                     | `Upstream`             |
//! | client-side timeout                                   | `Timeout`              |

use crate::error::GeneratorError;
use crate::generator::{GenerationRequest, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable consulted for the API key
pub const API_KEY_ENV: &str = "CLARITY_API_KEY";

/// Structured error codes meaning the account cannot be billed
const QUOTA_CODES: &[&str] = &[
    "insufficient_quota",
    "billing_hard_limit_reached",
    "billing_not_active",
];

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name, also recorded as artifact provenance
    pub model: String,
    /// Bearer token; never serialized back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl BackendConfig {
    /// With base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Fill the API key from [`API_KEY_ENV`] when set
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Classify a non-success response
#[must_use]
pub fn classify_failure(status: u16, body: &str) -> GeneratorError {
    if status == 402 {
        return GeneratorError::QuotaExceeded(format!("HTTP {status}"));
    }

    let quota_code = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| {
            let code = envelope
                .error
                .code
                .as_ref()
                .and_then(|c| c.as_str())
                .map(str::to_string);
            [code, envelope.error.kind]
                .into_iter()
                .flatten()
                .find(|c| QUOTA_CODES.contains(&c.as_str()))
        });

    match quota_code {
        Some(code) => GeneratorError::QuotaExceeded(code),
        None => GeneratorError::Upstream {
            status,
            body: body.to_string(),
        },
    }
}

/// Chat-completions generator
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: Client,
    config: BackendConfig,
    api_key: String,
}

impl ChatCompletionsClient {
    /// Create client; fails without an API key
    pub fn new(config: BackendConfig) -> Result<Self, GeneratorError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GeneratorError::NotConfigured(format!("missing API key (set {API_KEY_ENV})"))
            })?;
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        tracing::debug!(
            model = %self.config.model,
            max_tokens = request.max_tokens,
            "sending chat completion"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout(self.config.timeout())
                } else {
                    GeneratorError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "chat completion failed");
            return Err(classify_failure(status.as_u16(), &text));
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GeneratorError::EmptyResponse)
    }

    fn backend_tag(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payment_required_is_quota() {
        assert!(classify_failure(402, "").is_quota_exhausted());
    }

    #[test]
    fn structured_quota_code_is_quota() {
        let body = serde_json::json!({
            "error": {
                "message": "You exceeded your current quota",
                "type": "insufficient_quota",
                "code": "insufficient_quota"
            }
        })
        .to_string();
        assert_eq!(
            classify_failure(429, &body),
            GeneratorError::QuotaExceeded("insufficient_quota".into())
        );

        let billing = serde_json::json!({
            "error": {
                "message": "limit",
                "type": "invalid_request_error",
                "code": "billing_hard_limit_reached"
            }
        })
        .to_string();
        assert!(classify_failure(400, &billing).is_quota_exhausted());
    }

    #[test]
    fn message_text_alone_is_not_quota() {
        let body =
            r#"{"error":{"message":"quota billing quota","type":"rate_limit_error","code":null}}"#;
        assert!(matches!(
            classify_failure(429, body),
            GeneratorError::Upstream { status: 429, .. }
        ));
    }

    #[test]
    fn unparseable_body_is_upstream() {
        assert_eq!(
            classify_failure(500, "oops"),
            GeneratorError::Upstream {
                status: 500,
                body: "oops".into()
            }
        );
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = ChatCompletionsClient::new(BackendConfig::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::NotConfigured(_)));
    }

    #[test]
    fn client_tags_with_model() {
        let client = ChatCompletionsClient::new(
            BackendConfig::default()
                .with_model("deepseek-chat")
                .with_base_url("https://api.deepseek.com/v1/")
                .with_api_key("sk-test"),
        )
        .unwrap();
        assert_eq!(client.backend_tag(), "deepseek-chat");
        assert_eq!(client.endpoint(), "https://api.deepseek.com/v1/chat/completions");
    }

    #[test]
    fn config_never_serializes_key() {
        let config = BackendConfig::default().with_api_key("sk-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}

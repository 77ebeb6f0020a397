//! ShowReel LLM Service
//!
//! Text generation for marketing copy:
//! - OpenAI chat completions (JSON mode) for production
//! - Mock service with programmable responses for testing

pub mod mock;
pub mod openai;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 500;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),

    #[error("LLM rate limit exceeded")]
    RateLimit,
}

impl From<LlmError> for showreel_common::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(msg) => showreel_common::Error::Configuration(msg),
            LlmError::RateLimit => {
                showreel_common::Error::RateLimit("LLM rate limit exceeded".to_string())
            }
            other => showreel_common::Error::Upstream(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    /// Empty means the service default
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Ask the model for a single JSON object
    pub json_response: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub stop_reason: String,
}

/// LLM service configuration
#[derive(Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub default_model: String,
    pub max_tokens: u32,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        let default_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let base_url = std::env::var("OPENAI_BASE_URL").ok();

        Ok(Self {
            provider,
            api_key,
            default_model,
            max_tokens,
            base_url,
        })
    }
}

/// LLM service trait for different providers
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    fn default_model(&self) -> &str;
}

/// Factory for creating LlmService implementations
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!(model = %config.default_model, "Creating OpenAI LLM service");
                Ok(Box::new(openai::OpenAiService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: openai, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_key: Some("sk-secret".to_string()),
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            base_url: None,
        }
    }

    // LLM-U01: Factory creates both providers
    #[test]
    fn test_factory_known_providers() {
        let service = LlmServiceFactory::create(config("openai")).unwrap();
        assert_eq!(service.default_model(), "gpt-4o-mini");
        assert!(LlmServiceFactory::create(config("mock")).is_ok());
    }

    // LLM-U02: Factory rejects unknown provider
    #[test]
    fn test_factory_unknown_provider() {
        let err = match LlmServiceFactory::create(config("anthropic")) {
            Err(e) => e,
            Ok(_) => panic!("Expected error"),
        };
        assert!(err.to_string().contains("Unknown LLM provider: anthropic"));
    }

    // LLM-U03: Debug redacts API key
    #[test]
    fn test_config_debug_redacts_key() {
        let debug = format!("{:?}", config("openai"));
        assert!(!debug.contains("sk-secret"));
    }

    // LLM-U04: Error mapping
    #[test]
    fn test_error_mapping() {
        let mapped: showreel_common::Error = LlmError::Response("bad".into()).into();
        assert!(matches!(mapped, showreel_common::Error::Upstream(_)));
        let mapped: showreel_common::Error = LlmError::RateLimit.into();
        assert!(matches!(mapped, showreel_common::Error::RateLimit(_)));
    }
}

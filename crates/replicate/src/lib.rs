//! ShowReel Replicate Service
//!
//! Runs hosted models through the Replicate predictions API:
//! - HTTP client for production
//! - Scripted mock for testing and development
//! - `run_prediction`: create, poll until settled, extract the output URL

pub mod client;
pub mod mock;
pub mod models;
pub mod runner;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use models::{ImageModel, IDM_VTON_VERSION};
pub use runner::{generation_policy, run_prediction, tryon_policy, PredictionRun};

#[derive(Error, Debug)]
pub enum ReplicateError {
    #[error("Replicate configuration error: {0}")]
    Configuration(String),

    #[error("Replicate request error: {0}")]
    Request(String),

    #[error("Replicate response error: {0}")]
    Response(String),

    #[error("Replicate rate limit exceeded")]
    RateLimit,

    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Generation timeout after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("Unexpected output format: {0}")]
    UnexpectedOutput(String),

    #[error("Invalid image URL received from Replicate: {0}")]
    InvalidOutput(String),
}

impl From<ReplicateError> for showreel_common::Error {
    fn from(err: ReplicateError) -> Self {
        match err {
            ReplicateError::Configuration(msg) => showreel_common::Error::Configuration(msg),
            ReplicateError::RateLimit => {
                showreel_common::Error::RateLimit("Replicate rate limit exceeded".to_string())
            }
            other => showreel_common::Error::Upstream(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    /// Still running; keep polling
    pub fn is_pending(&self) -> bool {
        matches!(self, PredictionStatus::Starting | PredictionStatus::Processing)
    }
}

impl std::fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
            PredictionStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A prediction as returned by create and get
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl Prediction {
    /// Vendor error as text, if any
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Replicate service configuration
#[derive(Clone)]
pub struct ReplicateConfig {
    pub provider: String,
    pub api_token: Option<String>,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ReplicateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateConfig")
            .field("provider", &self.provider)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ReplicateConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ReplicateError> {
        let provider =
            std::env::var("REPLICATE_PROVIDER").unwrap_or_else(|_| "replicate".to_string());
        let api_token = std::env::var("REPLICATE_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        let base_url = std::env::var("REPLICATE_BASE_URL").ok();

        Ok(Self {
            provider,
            api_token,
            base_url,
        })
    }
}

/// Prediction backend
#[async_trait::async_trait]
pub trait PredictionService: Send + Sync {
    async fn create_prediction(
        &self,
        version: &str,
        input: serde_json::Value,
    ) -> Result<Prediction, ReplicateError>;

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateError>;

    /// Whether credentials are present; checked before running models
    fn is_configured(&self) -> bool;
}

/// Factory for creating PredictionService implementations
pub struct ReplicateServiceFactory;

impl ReplicateServiceFactory {
    pub fn create(config: ReplicateConfig) -> Result<Box<dyn PredictionService>, ReplicateError> {
        match config.provider.as_str() {
            "replicate" => {
                tracing::info!(
                    token_configured = config.api_token.is_some(),
                    "Creating Replicate prediction service"
                );
                Ok(Box::new(client::ReplicateClient::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock prediction service");
                Ok(Box::new(mock::MockReplicateService::new()))
            }
            provider => Err(ReplicateError::Configuration(format!(
                "Unknown prediction provider: {}. Supported providers: replicate, mock",
                provider
            ))),
        }
    }
}

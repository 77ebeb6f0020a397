//! ShowReel Video Render Service
//!
//! Turns the composite product image into a short marketing clip:
//! - Runway Gen-2 image-to-video for production
//! - Mock render service for testing and development
//! - `wait_for_video`: poll a submitted generation until it settles

pub mod client;
pub mod mock;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use showreel_common::{poll_until, PollError, PollPolicy, PollStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render configuration error: {0}")]
    Configuration(String),

    #[error("Render request error: {0}")]
    Request(String),

    #[error("Render response error: {0}")]
    Response(String),

    #[error("{0}")]
    Failed(String),

    #[error("Video generation timed out")]
    Timeout,
}

impl From<RenderError> for showreel_common::Error {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Configuration(msg) => showreel_common::Error::Configuration(msg),
            other => showreel_common::Error::Upstream(other.to_string()),
        }
    }
}

/// Image-to-video request
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Source image bytes, sent inline as a JPEG data URI
    pub image: Vec<u8>,
    pub prompt: String,
}

/// State of a submitted generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderStatus {
    Pending,
    Processing,
    Completed { video_url: String },
    Failed { error: String },
}

impl RenderStatus {
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            RenderStatus::Completed { .. } | RenderStatus::Failed { .. }
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Pending => "PENDING",
            RenderStatus::Processing => "PROCESSING",
            RenderStatus::Completed { .. } => "COMPLETED",
            RenderStatus::Failed { .. } => "FAILED",
        }
    }
}

/// Render service configuration
#[derive(Clone)]
pub struct RenderConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RenderConfig {
    /// Create render config from environment variables
    pub fn from_env() -> Result<Self, RenderError> {
        let provider = std::env::var("RUNWAY_PROVIDER").unwrap_or_else(|_| "runway".to_string());
        let api_key = std::env::var("RUNWAY_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        let base_url = std::env::var("RUNWAY_BASE_URL").ok();

        Ok(Self {
            provider,
            api_key,
            base_url,
        })
    }
}

/// Video render backend
#[async_trait::async_trait]
pub trait VideoRenderService: Send + Sync {
    /// Start a generation and return its id for polling
    async fn submit(&self, request: RenderRequest) -> Result<String, RenderError>;

    async fn status(&self, generation_id: &str) -> Result<RenderStatus, RenderError>;
}

/// Factory for creating VideoRenderService implementations
pub struct RenderServiceFactory;

impl RenderServiceFactory {
    pub fn create(config: RenderConfig) -> Result<Box<dyn VideoRenderService>, RenderError> {
        match config.provider.as_str() {
            "runway" => {
                tracing::info!(
                    key_configured = config.api_key.is_some(),
                    "Creating Runway render service"
                );
                Ok(Box::new(client::RunwayService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock render service");
                Ok(Box::new(mock::MockRenderService::new()))
            }
            provider => Err(RenderError::Configuration(format!(
                "Unknown render provider: {}. Supported providers: runway, mock",
                provider
            ))),
        }
    }
}

/// 30 checks, 15 seconds apart
pub fn render_policy() -> PollPolicy {
    PollPolicy::fixed(30, Duration::from_secs(15))
}

/// Poll a generation until it completes (video URL) or fails.
pub async fn wait_for_video(
    service: &dyn VideoRenderService,
    generation_id: &str,
    policy: &PollPolicy,
) -> Result<String, RenderError> {
    let outcome = poll_until(policy, "runway generation", |_| async move {
        let status = service.status(generation_id).await?;
        Ok::<_, RenderError>(if status.is_settled() {
            PollStatus::Ready(status)
        } else {
            PollStatus::Pending(status.as_str().to_string())
        })
    })
    .await
    .map_err(|e| match e {
        PollError::Exhausted { .. } => RenderError::Timeout,
        PollError::Check(inner) => inner,
    })?;

    match outcome.value {
        RenderStatus::Completed { video_url } => {
            tracing::info!(generation_id, attempts = outcome.attempts, "Video generation completed");
            Ok(video_url)
        }
        RenderStatus::Failed { error } => Err(RenderError::Failed(error)),
        other => Err(RenderError::Response(format!(
            "unexpected settled status {}",
            other.as_str()
        ))),
    }
}

/// Motion prompt for the product type (case-insensitive)
pub fn video_prompt(product_type: &str) -> &'static str {
    match product_type.to_lowercase().as_str() {
        "t-shirt" | "hoodie" => {
            "Professional fashion advertisement featuring the product with elegant movement, clean studio background, premium quality, smooth camera motion"
        }
        "tote bag" => {
            "Lifestyle product advertisement showing the bag being used, premium quality, elegant movement, clean background, smooth camera motion"
        }
        "mug" => {
            "Premium lifestyle advertisement featuring the product in use, steam rising, warm lighting, elegant movements, smooth camera motion"
        }
        "phone case" => {
            "Tech product advertisement showing the phone case from multiple angles, elegant lighting, premium quality, smooth camera motion"
        }
        "poster" => {
            "Home decor advertisement featuring the poster in an elegant interior, soft lighting, premium quality, smooth camera motion"
        }
        _ => {
            "Professional product advertisement featuring the item with elegant movement, clean studio background, premium quality, smooth camera motion"
        }
    }
}

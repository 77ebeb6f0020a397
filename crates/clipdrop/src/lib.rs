//! ShowReel Background Removal Service
//!
//! Cuts the product out of an uploaded photo:
//! - ClipDrop remove-background API for production
//! - Mock service for testing and development

pub mod client;
pub mod mock;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipDropError {
    #[error("ClipDrop configuration error: {0}")]
    Configuration(String),

    #[error("ClipDrop request error: {0}")]
    Request(String),

    #[error("ClipDrop API error: {0}")]
    Response(String),

    #[error("ClipDrop rate limit exceeded")]
    RateLimit,
}

impl From<ClipDropError> for showreel_common::Error {
    fn from(err: ClipDropError) -> Self {
        match err {
            ClipDropError::Configuration(msg) => showreel_common::Error::Configuration(msg),
            ClipDropError::RateLimit => {
                showreel_common::Error::RateLimit("ClipDrop rate limit exceeded".to_string())
            }
            other => showreel_common::Error::Upstream(other.to_string()),
        }
    }
}

/// Background removal configuration
#[derive(Clone)]
pub struct ClipDropConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ClipDropConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipDropConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ClipDropConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ClipDropError> {
        let provider = std::env::var("CLIPDROP_PROVIDER").unwrap_or_else(|_| "clipdrop".to_string());
        let api_key = std::env::var("CLIPDROP_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        let base_url = std::env::var("CLIPDROP_BASE_URL").ok();

        Ok(Self {
            provider,
            api_key,
            base_url,
        })
    }
}

/// Background removal backend
#[async_trait::async_trait]
pub trait BackgroundRemovalService: Send + Sync {
    /// Return the image with its background removed, as PNG bytes
    async fn remove_background(&self, image: Vec<u8>) -> Result<Vec<u8>, ClipDropError>;
}

/// Factory for creating BackgroundRemovalService implementations
pub struct ClipDropServiceFactory;

impl ClipDropServiceFactory {
    /// A missing API key is reported on first use, not here.
    pub fn create(
        config: ClipDropConfig,
    ) -> Result<Box<dyn BackgroundRemovalService>, ClipDropError> {
        match config.provider.as_str() {
            "clipdrop" => {
                tracing::info!(
                    key_configured = config.api_key.is_some(),
                    "Creating ClipDrop background removal service"
                );
                Ok(Box::new(client::ClipDropService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock background removal service");
                Ok(Box::new(mock::MockClipDropService::new()))
            }
            provider => Err(ClipDropError::Configuration(format!(
                "Unknown background removal provider: {}. Supported providers: clipdrop, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> ClipDropConfig {
        ClipDropConfig {
            provider: provider.to_string(),
            api_key: Some("cd-key".to_string()),
            base_url: None,
        }
    }

    // CD-U01: Factory creates both providers
    #[test]
    fn test_factory_known_providers() {
        assert!(ClipDropServiceFactory::create(config("clipdrop")).is_ok());
        assert!(ClipDropServiceFactory::create(config("mock")).is_ok());
    }

    // CD-U02: Factory rejects unknown provider
    #[test]
    fn test_factory_unknown_provider() {
        let err = match ClipDropServiceFactory::create(config("removebg")) {
            Err(e) => e,
            Ok(_) => panic!("Expected error"),
        };
        assert!(err
            .to_string()
            .contains("Unknown background removal provider: removebg"));
    }

    // CD-U03: Debug redacts API key
    #[test]
    fn test_config_debug_redacts_key() {
        let debug = format!("{:?}", config("clipdrop"));
        assert!(!debug.contains("cd-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    // CD-U04: Error display and mapping
    #[test]
    fn test_error_display_and_mapping() {
        let err = ClipDropError::Response("400 - bad image".to_string());
        assert_eq!(err.to_string(), "ClipDrop API error: 400 - bad image");

        let mapped: showreel_common::Error = err.into();
        assert!(matches!(mapped, showreel_common::Error::Upstream(_)));

        let mapped: showreel_common::Error = ClipDropError::RateLimit.into();
        assert!(matches!(mapped, showreel_common::Error::RateLimit(_)));
    }
}

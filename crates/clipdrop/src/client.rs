//! ClipDrop API Implementation
//!
//! Calls the remove-background endpoint
//! (https://clipdrop-api.co/remove-background/v1) with a multipart upload.

use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::{BackgroundRemovalService, ClipDropConfig, ClipDropError};

const DEFAULT_BASE_URL: &str = "https://clipdrop-api.co";

pub struct ClipDropService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ClipDropService {
    pub fn new(config: ClipDropConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl BackgroundRemovalService for ClipDropService {
    async fn remove_background(&self, image: Vec<u8>) -> Result<Vec<u8>, ClipDropError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ClipDropError::Configuration("ClipDrop API key is not configured".to_string())
        })?;

        let size = image.len();
        let part = Part::bytes(image)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| ClipDropError::Request(format!("Invalid multipart part: {}", e)))?;
        let form = Form::new().part("image_file", part);

        let url = format!("{}/remove-background/v1", self.base_url);
        tracing::debug!(size, "Sending ClipDrop remove-background request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("accept", "image/png")
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClipDropError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClipDropError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ClipDropError::Response(format!(
                "{} - {}",
                status.as_u16(),
                error_body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClipDropError::Response(format!("Failed to read image: {}", e)))?;

        tracing::debug!(input = size, output = bytes.len(), "ClipDrop returned cutout");
        Ok(bytes.to_vec())
    }
}

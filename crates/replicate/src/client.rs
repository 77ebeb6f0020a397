//! Replicate HTTP Implementation
//!
//! `POST /v1/predictions` and `GET /v1/predictions/{id}` against
//! https://api.replicate.com with `Authorization: Token {token}`.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Prediction, PredictionService, ReplicateConfig, ReplicateError};

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

#[derive(Debug, Serialize)]
struct CreatePredictionRequest<'a> {
    version: &'a str,
    input: serde_json::Value,
}

/// Replicate API error body
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: String,
}

pub struct ReplicateClient {
    client: Client,
    api_token: Option<String>,
    base_url: String,
}

impl ReplicateClient {
    pub fn new(config: ReplicateConfig) -> Self {
        Self {
            client: Client::new(),
            api_token: config.api_token,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn token(&self) -> Result<&str, ReplicateError> {
        self.api_token.as_deref().ok_or_else(|| {
            ReplicateError::Configuration("Replicate API token not configured".to_string())
        })
    }

    async fn parse(response: reqwest::Response) -> Result<Prediction, ReplicateError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ReplicateError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            let detail = serde_json::from_str::<ErrorResponse>(&error_body)
                .map(|e| e.detail)
                .unwrap_or(error_body);
            return Err(ReplicateError::Response(format!(
                "Replicate API error: {} {}",
                status.as_u16(),
                detail
            )));
        }

        response
            .json::<Prediction>()
            .await
            .map_err(|e| ReplicateError::Response(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait::async_trait]
impl PredictionService for ReplicateClient {
    async fn create_prediction(
        &self,
        version: &str,
        input: serde_json::Value,
    ) -> Result<Prediction, ReplicateError> {
        let token = self.token()?;
        let url = format!("{}/v1/predictions", self.base_url);

        tracing::debug!(version, "Creating Replicate prediction");

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Token {}", token))
            .json(&CreatePredictionRequest { version, input })
            .send()
            .await
            .map_err(|e| ReplicateError::Request(format!("HTTP request failed: {}", e)))?;

        let prediction = Self::parse(response).await?;
        tracing::info!(prediction_id = %prediction.id, status = %prediction.status, "Replicate prediction created");
        Ok(prediction)
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateError> {
        let token = self.token()?;
        let url = format!("{}/v1/predictions/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Token {}", token))
            .send()
            .await
            .map_err(|e| ReplicateError::Request(format!("HTTP request failed: {}", e)))?;

        Self::parse(response).await
    }

    fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }
}

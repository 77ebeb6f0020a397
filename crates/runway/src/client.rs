//! Runway Gen-2 HTTP Implementation

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{RenderConfig, RenderError, RenderRequest, RenderStatus, VideoRenderService};

const DEFAULT_BASE_URL: &str = "https://api.runwayml.com";
const MODEL: &str = "runway/gen-2";

/// 5 seconds at 24 fps
const NUM_FRAMES: u32 = 120;
const FPS: u32 = 24;
const GUIDANCE_SCALE: u32 = 12;

#[derive(Debug, Serialize)]
struct GenerationJobRequest<'a> {
    model: &'a str,
    parameters: GenerationParameters<'a>,
}

#[derive(Debug, Serialize)]
struct GenerationParameters<'a> {
    prompt: &'a str,
    image: String,
    mode: &'a str,
    num_frames: u32,
    fps: u32,
    guidance_scale: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationJobCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GenerationJob {
    status: String,
    #[serde(default)]
    output: Option<GenerationOutput>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    video_url: Option<String>,
}

impl GenerationJob {
    fn into_status(self) -> Result<RenderStatus, RenderError> {
        match self.status.as_str() {
            "PENDING" => Ok(RenderStatus::Pending),
            "PROCESSING" => Ok(RenderStatus::Processing),
            "COMPLETED" => self
                .output
                .and_then(|o| o.video_url)
                .map(|video_url| RenderStatus::Completed { video_url })
                .ok_or_else(|| {
                    RenderError::Response("Completed job has no output.video_url".to_string())
                }),
            "FAILED" => Ok(RenderStatus::Failed {
                error: self.error.unwrap_or_else(|| "Task failed".to_string()),
            }),
            other => Err(RenderError::Response(format!(
                "Unknown generation status: {}",
                other
            ))),
        }
    }
}

pub struct RunwayService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl RunwayService {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn api_key(&self) -> Result<&str, RenderError> {
        self.api_key.as_deref().ok_or_else(|| {
            RenderError::Configuration("Runway API key is not configured".to_string())
        })
    }

    async fn error_body(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string())
    }
}

#[async_trait::async_trait]
impl VideoRenderService for RunwayService {
    async fn submit(&self, request: RenderRequest) -> Result<String, RenderError> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1/generationJob", self.base_url);

        let image = format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&request.image)
        );
        let body = GenerationJobRequest {
            model: MODEL,
            parameters: GenerationParameters {
                prompt: &request.prompt,
                image,
                mode: "video",
                num_frames: NUM_FRAMES,
                fps: FPS,
                guidance_scale: GUIDANCE_SCALE,
            },
        };

        tracing::debug!(image_bytes = request.image.len(), "Submitting Runway generation");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RenderError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = Self::error_body(response).await;
            return Err(RenderError::Response(format!(
                "Runway API error: {} - {}",
                status, body
            )));
        }

        let created: GenerationJobCreated = response
            .json()
            .await
            .map_err(|e| RenderError::Response(format!("Failed to parse response: {}", e)))?;

        tracing::info!(generation_id = %created.id, "Runway generation initiated");
        Ok(created.id)
    }

    async fn status(&self, generation_id: &str) -> Result<RenderStatus, RenderError> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1/generationJob/{}", self.base_url, generation_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| RenderError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = Self::error_body(response).await;
            return Err(RenderError::Response(format!(
                "Runway status check error: {} - {}",
                status, body
            )));
        }

        let job: GenerationJob = response
            .json()
            .await
            .map_err(|e| RenderError::Response(format!("Failed to parse response: {}", e)))?;

        tracing::debug!(generation_id, status = %job.status, "Runway task status");
        job.into_status()
    }
}

//! One-off Replicate endpoints
//!
//! `POST /api/generate-model` and `POST /api/virtual-tryon` run a single
//! prediction and answer with the `{success, imageUrl, processingTime,
//! metadata}` envelope the try-on UI reads.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use showreel_common::{Error, Result, ValidatedJson};
use showreel_replicate::ImageModel;

use crate::api::middleware::TryOnState;
use crate::generation::{GeneratedImage, DEFAULT_ASPECT_RATIO};

const PROMPT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateModelRequest {
    pub prompt: Option<String>,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

fn default_model() -> String {
    "flux".to_string()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VirtualTryOnRequest {
    pub clothing_image_url: Option<String>,
    pub model_image_url: Option<String>,
    pub clothing_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationEnvelope<M> {
    pub success: bool,
    pub image_url: String,
    pub processing_time: u64,
    pub metadata: M,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub attempts: u32,
    pub replicate_id: String,
    /// Version id that ran
    pub model: String,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnMetadata {
    pub attempts: u32,
    pub replicate_id: String,
    pub clothing_type: String,
}

fn envelope<M>(image: GeneratedImage, metadata: M) -> GenerationEnvelope<M> {
    GenerationEnvelope {
        success: true,
        image_url: image.image_url,
        processing_time: image.processing_time,
        metadata,
    }
}

/// First 100 characters followed by "..."
pub fn prompt_preview(prompt: &str) -> String {
    let preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
    format!("{}...", preview)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn generate_model(
    State(state): State<TryOnState>,
    ValidatedJson(request): ValidatedJson<GenerateModelRequest>,
) -> Result<Json<GenerationEnvelope<ModelMetadata>>> {
    let prompt = present(request.prompt)
        .ok_or_else(|| Error::Validation("Missing required parameter: prompt".to_string()))?;
    let model = ImageModel::from_name(&request.model);

    let image = state
        .tryon
        .generate_model(prompt.clone(), request.aspect_ratio, model)
        .await?;

    let metadata = ModelMetadata {
        attempts: image.attempts,
        replicate_id: image.replicate_id.clone(),
        model: image.version.to_string(),
        prompt: prompt_preview(&prompt),
    };
    Ok(Json(envelope(image, metadata)))
}

pub async fn virtual_tryon(
    State(state): State<TryOnState>,
    ValidatedJson(request): ValidatedJson<VirtualTryOnRequest>,
) -> Result<Json<GenerationEnvelope<TryOnMetadata>>> {
    let (Some(clothing), Some(model), Some(clothing_type)) = (
        present(request.clothing_image_url),
        present(request.model_image_url),
        present(request.clothing_type),
    ) else {
        return Err(Error::Validation(
            "Missing required parameters: clothingImageUrl, modelImageUrl, clothingType"
                .to_string(),
        ));
    };

    let image = state.tryon.try_on(&clothing, &model, &clothing_type).await?;

    let metadata = TryOnMetadata {
        attempts: image.attempts,
        replicate_id: image.replicate_id.clone(),
        clothing_type,
    };
    Ok(Json(envelope(image, metadata)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_model_request_defaults() {
        let request: GenerateModelRequest =
            serde_json::from_value(json!({"prompt": "a model"})).unwrap();
        assert_eq!(request.aspect_ratio, "3:4");
        assert_eq!(request.model, "flux");
        assert_eq!(ImageModel::from_name(&request.model), ImageModel::FluxUltra);
    }

    #[test]
    fn test_prompt_preview_truncates() {
        let long = "a".repeat(150);
        let preview = prompt_preview(&long);
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));

        assert_eq!(prompt_preview("short"), "short...");
    }

    #[test]
    fn test_prompt_preview_is_char_safe() {
        let prompt = "é".repeat(120);
        assert_eq!(prompt_preview(&prompt).chars().count(), 103);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        assert_eq!(present(Some("  ".to_string())), None);
        assert_eq!(present(Some("x".to_string())), Some("x".to_string()));
    }

    #[test]
    fn test_envelope_shape() {
        let image = GeneratedImage {
            image_url: "https://cdn.example.com/out.png".to_string(),
            processing_time: 12,
            attempts: 7,
            replicate_id: "abc123".to_string(),
            version: "v1",
        };
        let metadata = TryOnMetadata {
            attempts: image.attempts,
            replicate_id: image.replicate_id.clone(),
            clothing_type: "dress".to_string(),
        };
        let value = serde_json::to_value(envelope(image, metadata)).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["imageUrl"], "https://cdn.example.com/out.png");
        assert_eq!(value["processingTime"], 12);
        assert_eq!(value["metadata"]["replicateId"], "abc123");
        assert_eq!(value["metadata"]["clothingType"], "dress");
    }
}

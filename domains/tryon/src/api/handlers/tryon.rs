//! Try-on generation handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use showreel_common::files::multipart_error;
use showreel_common::{read_image_field, Error, ImageUpload, Result, ValidatedJson};

use crate::api::middleware::TryOnState;
use crate::domain::presets::{
    background_url, BackgroundPreset, DemoItem, ModelPresets, BACKGROUND_PRESETS, DEMO_ITEMS,
    MODEL_PRESETS,
};
use crate::domain::{GenerationProject, TryOnCreationParams};

/// Generation with its resolved background
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(flatten)]
    pub generation: GenerationProject,
    pub background_url: String,
}

impl From<GenerationProject> for GenerationResponse {
    fn from(generation: GenerationProject) -> Self {
        Self {
            background_url: background_url(&generation.background_options),
            generation,
        }
    }
}

/// Request for extra model photos
#[derive(Debug, Deserialize, Validate)]
pub struct VariationsRequest {
    #[serde(default = "default_variation_count")]
    #[validate(range(min = 1, max = 12))]
    pub count: usize,
}

fn default_variation_count() -> usize {
    4
}

#[derive(Debug, Serialize)]
pub struct VariationsResponse {
    pub variations: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetsResponse {
    pub model_presets: ModelPresets,
    pub background_presets: &'static [BackgroundPreset],
    pub demo_items: &'static [DemoItem],
}

/// Upload a garment (and optional template) and start a generation
pub async fn create_generation(
    State(state): State<TryOnState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<GenerationResponse>)> {
    let mut clothing: Option<ImageUpload> = None;
    let mut template: Option<ImageUpload> = None;
    let mut options: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "clothingImage" => clothing = Some(read_image_field(field).await?),
            "templateImage" => {
                let upload = read_image_field(field).await?;
                // an untouched file input arrives as an empty part
                if !upload.bytes.is_empty() {
                    template = Some(upload);
                }
            }
            "options" => options = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let clothing =
        clothing.ok_or_else(|| Error::Validation("Please select a clothing image".to_string()))?;
    let options = options.ok_or_else(|| Error::Validation("Missing options".to_string()))?;
    let params: TryOnCreationParams = serde_json::from_str(&options)
        .map_err(|e| Error::Validation(format!("Invalid options: {}", e)))?;

    let generation = state.tryon.create(params, clothing, template).await?;
    Ok((StatusCode::CREATED, Json(generation.into())))
}

/// List generations, newest first
pub async fn list_generations(
    State(state): State<TryOnState>,
) -> Result<Json<Vec<GenerationResponse>>> {
    let generations = state.tryon.list().await?;
    Ok(Json(generations.into_iter().map(Into::into).collect()))
}

pub async fn get_generation(
    State(state): State<TryOnState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerationResponse>> {
    Ok(Json(state.tryon.get(id).await?.into()))
}

pub async fn generate_variations(
    State(state): State<TryOnState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<VariationsRequest>,
) -> Result<Json<VariationsResponse>> {
    let variations = state.tryon.generate_variations(id, request.count).await?;
    Ok(Json(VariationsResponse { variations }))
}

pub async fn get_presets() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        model_presets: MODEL_PRESETS,
        background_presets: BACKGROUND_PRESETS,
        demo_items: DEMO_ITEMS,
    })
}

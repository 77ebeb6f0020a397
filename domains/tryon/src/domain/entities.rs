//! Try-on generation entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use showreel_common::{Error, Record, Result};

use crate::domain::options::{BackgroundOptions, CameraOptions, ClothingType, ModelOptions};
use crate::domain::state::{GenerationEvent, GenerationState, GenerationStateMachine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Pending,
    Processing,
    Enhancing,
    Complete,
    Error,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    pub fn to_state(&self) -> GenerationState {
        match self {
            GenerationStatus::Pending => GenerationState::Pending,
            GenerationStatus::Processing => GenerationState::Processing,
            GenerationStatus::Enhancing => GenerationState::Enhancing,
            GenerationStatus::Complete => GenerationState::Complete,
            GenerationStatus::Error => GenerationState::Error,
        }
    }

    pub fn from_state(state: GenerationState) -> Self {
        match state {
            GenerationState::Pending => GenerationStatus::Pending,
            GenerationState::Processing => GenerationStatus::Processing,
            GenerationState::Enhancing => GenerationStatus::Enhancing,
            GenerationState::Complete => GenerationStatus::Complete,
            GenerationState::Error => GenerationStatus::Error,
        }
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// The `options` part of a try-on upload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TryOnCreationParams {
    pub clothing_type: ClothingType,
    pub model_options: ModelOptions,
    pub background_options: BackgroundOptions,
    pub camera_options: CameraOptions,
    #[validate(length(max = 1000))]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub generate_video: bool,
    #[serde(default)]
    pub enhance: bool,
}

/// One try-on generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProject {
    pub id: Uuid,
    pub status: GenerationStatus,

    pub clothing_image_url: String,
    pub clothing_type: ClothingType,

    pub model_options: ModelOptions,
    pub background_options: BackgroundOptions,
    pub camera_options: CameraOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub enhance: bool,
    #[serde(default)]
    pub generate_video: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upscaled_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// Seconds from start of processing to the try-on result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

impl Record for GenerationProject {
    const COLLECTION: &'static str = "uwear_projects";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status_key(&self) -> String {
        self.status.to_string()
    }
}

impl GenerationProject {
    pub fn new(
        id: Uuid,
        params: TryOnCreationParams,
        clothing_image_url: String,
        template_image_url: Option<String>,
    ) -> Result<Self> {
        params
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;

        let now = Utc::now();
        Ok(GenerationProject {
            id,
            status: GenerationStatus::default(),
            clothing_image_url,
            clothing_type: params.clothing_type,
            model_options: params.model_options,
            background_options: params.background_options,
            camera_options: params.camera_options,
            template_image_url,
            custom_instructions: params
                .custom_instructions
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            enhance: params.enhance,
            generate_video: params.generate_video,
            generated_image_url: None,
            enhanced_image_url: None,
            upscaled_image_url: None,
            video_url: None,
            error: None,
            created_at: now,
            updated_at: now,
            processing_time: None,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn start_processing(&mut self) -> Result<()> {
        self.apply(GenerationEvent::StartProcessing)
    }

    pub fn set_generated(&mut self, url: String, processing_time: f64) {
        self.generated_image_url = Some(url);
        self.processing_time = Some(processing_time);
        self.touch();
    }

    /// Enter enhancement; requires the generated image
    pub fn begin_enhancing(&mut self) -> Result<()> {
        if self.generated_image_url.is_none() {
            return Err(Error::Validation(
                "Generated image is required before enhancement".to_string(),
            ));
        }
        self.apply(GenerationEvent::StartEnhancing)
    }

    pub fn set_enhanced(&mut self, url: String) {
        self.enhanced_image_url = Some(url);
        self.touch();
    }

    pub fn set_video(&mut self, url: String) {
        self.video_url = Some(url);
        self.touch();
    }

    pub fn complete(&mut self) -> Result<()> {
        if self.generated_image_url.is_none() {
            return Err(Error::Validation(
                "Cannot complete a generation without a generated image".to_string(),
            ));
        }
        self.apply(GenerationEvent::Finish)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.apply(GenerationEvent::Fail)?;
        self.error = Some(message.into());
        Ok(())
    }

    fn apply(&mut self, event: GenerationEvent) -> Result<()> {
        let next = GenerationStateMachine::transition(self.status.to_state(), event)
            .map_err(|e| e.into_error("generation"))?;
        self.status = GenerationStatus::from_state(next);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

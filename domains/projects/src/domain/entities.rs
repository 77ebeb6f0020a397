//! Project domain entities for ShowReel
//!
//! A `Project` is one product video moving through the pipeline. The
//! pipeline mutates it in place; every mutation goes through a method
//! here so status changes stay inside the state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use showreel_common::{Error, Record, Result};

use crate::domain::overlay;
use crate::domain::state::{ProjectEvent, ProjectState, ProjectStateMachine};

/// Product types with dedicated placeholders and prompts
pub const KNOWN_PRODUCT_TYPES: &[&str] =
    &["t-shirt", "hoodie", "tote bag", "mug", "phone case", "poster"];

/// Project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Pending,
    ProcessingBackground,
    ProcessingMannequin,
    ProcessingScript,
    Rendering,
    Complete,
    Error,
}

impl ProjectStatus {
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    /// Convert to state machine state
    pub fn to_state(&self) -> ProjectState {
        match self {
            ProjectStatus::Pending => ProjectState::Pending,
            ProjectStatus::ProcessingBackground => ProjectState::ProcessingBackground,
            ProjectStatus::ProcessingMannequin => ProjectState::ProcessingMannequin,
            ProjectStatus::ProcessingScript => ProjectState::ProcessingScript,
            ProjectStatus::Rendering => ProjectState::Rendering,
            ProjectStatus::Complete => ProjectState::Complete,
            ProjectStatus::Error => ProjectState::Error,
        }
    }

    /// Create from state machine state
    pub fn from_state(state: ProjectState) -> Self {
        match state {
            ProjectState::Pending => ProjectStatus::Pending,
            ProjectState::ProcessingBackground => ProjectStatus::ProcessingBackground,
            ProjectState::ProcessingMannequin => ProjectStatus::ProcessingMannequin,
            ProjectState::ProcessingScript => ProjectStatus::ProcessingScript,
            ProjectState::Rendering => ProjectStatus::Rendering,
            ProjectState::Complete => ProjectStatus::Complete,
            ProjectState::Error => ProjectStatus::Error,
        }
    }

    /// Human-readable progress label
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "Uploading",
            ProjectStatus::ProcessingBackground => "Removing Background",
            ProjectStatus::ProcessingMannequin => "Generating Mannequin",
            ProjectStatus::ProcessingScript => "Creating Marketing Copy",
            ProjectStatus::Rendering => "Rendering Video",
            ProjectStatus::Complete => "Complete",
            ProjectStatus::Error => "Error",
        }
    }

    /// Progress bar value, 0-100
    pub fn progress_percent(&self) -> u8 {
        match self {
            ProjectStatus::Pending => 10,
            ProjectStatus::ProcessingBackground => 25,
            ProjectStatus::ProcessingMannequin => 45,
            ProjectStatus::ProcessingScript => 65,
            ProjectStatus::Rendering => 85,
            ProjectStatus::Complete | ProjectStatus::Error => 100,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// Marketing copy for the video overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub headline: String,
    pub bullets: Vec<String>,
    pub cta: String,
    pub color_palette: Vec<String>,
}

impl Script {
    /// Parse and validate a JSON-mode completion.
    ///
    /// Errors read "Invalid script format: ..." like the checks they come from.
    pub fn from_completion(content: &str) -> std::result::Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| format!("Invalid script format: response is not JSON ({})", e))?;

        let headline = match value.get("headline").and_then(|v| v.as_str()) {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err("Invalid script format: headline is missing or not a string".into()),
        };
        let bullets = string_array(&value, "bullets")
            .filter(|b| b.len() == 3)
            .ok_or("Invalid script format: bullets must be an array of 3 items")?;
        let cta = match value.get("cta").and_then(|v| v.as_str()) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => return Err("Invalid script format: cta is missing or not a string".into()),
        };
        let color_palette = string_array(&value, "colorPalette")
            .filter(|c| c.len() == 3)
            .ok_or("Invalid script format: colorPalette must be an array of 3 hex colors")?;

        Ok(Script {
            headline,
            bullets,
            cta,
            color_palette,
        })
    }
}

fn string_array(value: &serde_json::Value, key: &str) -> Option<Vec<String>> {
    value
        .get(key)?
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(String::from))
        .collect()
}

/// Where the mannequin image came from
#[derive(Debug, Clone, PartialEq)]
pub struct MannequinImage {
    pub url: String,
    /// Replicate prediction id (generated) or simulated task id
    pub task_id: Option<String>,
    /// Curated catalog photo id (fallback)
    pub photo_id: Option<String>,
}

/// Form fields accompanying the product upload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreationParams {
    #[validate(custom(function = "not_blank", message = "Product type is required"))]
    pub product_type: String,

    #[validate(
        length(max = 200),
        custom(function = "not_blank", message = "Product name is required")
    )]
    pub product_name: String,

    #[validate(length(max = 2000))]
    pub product_description: Option<String>,
}

fn not_blank(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub status: ProjectStatus,
    pub product_type: String,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,

    pub original_image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mannequin_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mannequin_task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mannequin_photo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runway_generation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// ffmpeg `-vf` argument that would burn the script into the video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_filter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";

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

impl Project {
    /// Create a pending project for an uploaded original image
    pub fn new(id: Uuid, params: ProjectCreationParams, original_image_url: String) -> Result<Self> {
        params
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;

        let now = Utc::now();
        Ok(Project {
            id,
            status: ProjectStatus::default(),
            product_type: params.product_type.trim().to_string(),
            product_name: params.product_name.trim().to_string(),
            product_description: params
                .product_description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            original_image_url,
            transparent_image_url: None,
            mannequin_image_url: None,
            mannequin_task_id: None,
            mannequin_photo_id: None,
            composite_image_url: None,
            script: None,
            runway_generation_id: None,
            video_url: None,
            overlay_filter: None,
            error: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[mutants::skip] // Delegates to ProjectStatus::is_terminal()
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the product type has dedicated placeholders
    pub fn has_known_product_type(&self) -> bool {
        KNOWN_PRODUCT_TYPES.contains(&self.product_type.to_lowercase().as_str())
    }

    /// Enter the background removal step
    pub fn start_processing(&mut self) -> Result<()> {
        self.apply(ProjectEvent::StartProcessing)
    }

    pub fn set_transparent_image(&mut self, url: String) {
        self.transparent_image_url = Some(url);
        self.touch();
    }

    /// Enter the mannequin step; requires the transparent image
    pub fn begin_mannequin(&mut self) -> Result<()> {
        if self.transparent_image_url.is_none() {
            return Err(Error::Validation(
                "Transparent image is required before mannequin generation".to_string(),
            ));
        }
        self.apply(ProjectEvent::BackgroundRemoved)
    }

    pub fn set_mannequin(&mut self, mannequin: MannequinImage) {
        self.mannequin_image_url = Some(mannequin.url);
        self.mannequin_task_id = mannequin.task_id;
        self.mannequin_photo_id = mannequin.photo_id;
        self.touch();
    }

    /// Enter the script step; requires the mannequin image
    pub fn begin_script(&mut self) -> Result<()> {
        if self.mannequin_image_url.is_none() {
            return Err(Error::Validation(
                "Mannequin image is required before script generation".to_string(),
            ));
        }
        self.apply(ProjectEvent::MannequinReady)
    }

    pub fn set_script(&mut self, script: Script) {
        self.script = Some(script);
        self.touch();
    }

    /// Enter rendering. The composite is the mannequin image and the
    /// overlay filter is derived from the script.
    pub fn begin_rendering(&mut self) -> Result<()> {
        let (Some(_), Some(mannequin), Some(script)) = (
            self.transparent_image_url.as_ref(),
            self.mannequin_image_url.clone(),
            self.script.as_ref(),
        ) else {
            return Err(Error::Validation(
                "Missing required assets for video generation".to_string(),
            ));
        };
        let filter = overlay::ffmpeg_text_command(script);

        self.apply(ProjectEvent::ScriptReady)?;
        self.composite_image_url = Some(mannequin);
        self.overlay_filter = Some(filter);
        Ok(())
    }

    pub fn set_render_job(&mut self, generation_id: String) {
        self.runway_generation_id = Some(generation_id);
        self.touch();
    }

    /// Finish with the rendered video
    pub fn complete(&mut self, video_url: String) -> Result<()> {
        self.apply(ProjectEvent::VideoReady)?;
        self.video_url = Some(video_url);
        Ok(())
    }

    /// Stop the pipeline with an error message
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.apply(ProjectEvent::Fail)?;
        self.error = Some(message.into());
        Ok(())
    }

    fn apply(&mut self, event: ProjectEvent) -> Result<()> {
        let next = ProjectStateMachine::transition(self.status.to_state(), event)
            .map_err(|e| e.into_error("project"))?;
        self.status = ProjectStatus::from_state(next);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

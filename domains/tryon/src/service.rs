//! Try-on operations used by the HTTP layer

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use showreel_common::{Error, ImageUpload, RecordStore, Result};
use showreel_replicate::{ImageModel, PredictionService};
use showreel_storage::{tryon_asset_path, ObjectStorage, TryOnRole};

use crate::domain::models::select_model_photo;
use crate::domain::{GenerationProject, TryOnCreationParams};
use crate::generation::{
    generate_model_image, virtual_try_on, GeneratedImage, ModelGenerationRequest,
};
use crate::pipeline::TryOnPipeline;

#[derive(Clone)]
pub struct TryOnService {
    store: Arc<dyn RecordStore<GenerationProject>>,
    storage: Arc<dyn ObjectStorage>,
    replicate: Arc<dyn PredictionService>,
    pipeline: TryOnPipeline,
}

impl TryOnService {
    pub fn new(pipeline: TryOnPipeline) -> Self {
        let services = pipeline.services();
        Self {
            store: Arc::clone(&services.store),
            storage: Arc::clone(&services.storage),
            replicate: Arc::clone(&services.replicate),
            pipeline,
        }
    }

    /// Store the uploads, save a pending generation, and start processing
    pub async fn create(
        &self,
        params: TryOnCreationParams,
        clothing: ImageUpload,
        template: Option<ImageUpload>,
    ) -> Result<GenerationProject> {
        params
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;
        clothing.validate()?;
        if let Some(template) = &template {
            template.validate()?;
        }

        let id = Uuid::new_v4();
        let clothing_url = self.store_upload(id, TryOnRole::Clothing, clothing).await?;
        let template_url = match template {
            Some(template) => Some(self.store_upload(id, TryOnRole::Template, template).await?),
            None => None,
        };

        let generation = GenerationProject::new(id, params, clothing_url, template_url)?;
        self.store.save(&generation).await?;
        tracing::info!(
            generation_id = %id,
            clothing_type = %generation.clothing_type,
            "Created generation project"
        );

        self.pipeline.start(id);
        Ok(generation)
    }

    async fn store_upload(&self, id: Uuid, role: TryOnRole, upload: ImageUpload) -> Result<String> {
        let path = tryon_asset_path(id, role, &upload.clean_name());
        Ok(self
            .storage
            .upload(&path, upload.bytes, &upload.content_type)
            .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<GenerationProject> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<GenerationProject>> {
        Ok(self.store.list().await?)
    }

    /// Curated model photos matching the generation's options
    pub async fn generate_variations(&self, id: Uuid, count: usize) -> Result<Vec<String>> {
        let generation = self.get(id).await?;
        let mut rng = rand::thread_rng();
        Ok((0..count)
            .map(|_| {
                select_model_photo(
                    &generation.model_options,
                    generation.camera_options.angle,
                    &mut rng,
                )
            })
            .collect())
    }

    fn ensure_configured(&self) -> Result<()> {
        if !self.replicate.is_configured() {
            return Err(Error::Configuration(
                "Replicate API token not configured".to_string(),
            ));
        }
        Ok(())
    }

    /// One-off model image generation
    pub async fn generate_model(
        &self,
        prompt: String,
        aspect_ratio: String,
        model: ImageModel,
    ) -> Result<GeneratedImage> {
        self.ensure_configured()?;
        let request = ModelGenerationRequest {
            prompt,
            aspect_ratio,
            model,
        };
        Ok(generate_model_image(self.replicate.as_ref(), &request).await?)
    }

    /// One-off virtual try-on of a garment onto a model photo
    pub async fn try_on(
        &self,
        clothing_image_url: &str,
        model_image_url: &str,
        clothing_type: &str,
    ) -> Result<GeneratedImage> {
        self.ensure_configured()?;
        Ok(virtual_try_on(
            self.replicate.as_ref(),
            clothing_image_url,
            model_image_url,
            clothing_type,
        )
        .await?)
    }
}

//! Try-on pipeline
//!
//! Picks a model image (template, generated, or curated), dresses it in the
//! uploaded garment, then runs the optional enhancement and video steps.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use showreel_common::{ApiModeSwitch, Error, RecordStore, RepositoryError};
use showreel_replicate::{ImageModel, PredictionService, ReplicateError};
use showreel_storage::ObjectStorage;

use crate::domain::models::select_model_photo;
use crate::domain::presets::SAMPLE_VIDEO_URL;
use crate::domain::prompt::build_model_prompt;
use crate::domain::{GenerationProject, GenerationStatus};
use crate::generation::{generate_model_image, virtual_try_on, ModelGenerationRequest};

#[derive(Clone)]
pub struct TryOnServices {
    pub store: Arc<dyn RecordStore<GenerationProject>>,
    pub storage: Arc<dyn ObjectStorage>,
    pub replicate: Arc<dyn PredictionService>,
    pub mode: Arc<ApiModeSwitch>,
}

/// Simulated durations of the optional steps
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnTimings {
    pub enhance: Duration,
    pub video: Duration,
}

impl Default for TryOnTimings {
    fn default() -> Self {
        Self {
            enhance: Duration::from_secs(2),
            video: Duration::from_secs(3),
        }
    }
}

impl TryOnTimings {
    pub fn instant() -> Self {
        Self {
            enhance: Duration::ZERO,
            video: Duration::ZERO,
        }
    }
}

#[derive(Error, Debug)]
enum TryOnError {
    #[error("Virtual try-on generation failed: {0}")]
    TryOn(#[source] ReplicateError),

    #[error("Replicate API token not configured")]
    NotConfigured,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Domain(#[from] Error),

    #[error("Generation project not found")]
    Missing,
}

#[derive(Clone)]
pub struct TryOnPipeline {
    services: TryOnServices,
    timings: TryOnTimings,
}

impl TryOnPipeline {
    pub fn new(services: TryOnServices) -> Self {
        Self {
            services,
            timings: TryOnTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: TryOnTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn services(&self) -> &TryOnServices {
        &self.services
    }

    pub fn start(&self, generation_id: Uuid) -> tokio::task::JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.run(generation_id).await })
    }

    /// Run the generation to completion on the current task
    pub async fn run(&self, generation_id: Uuid) {
        let span = tracing::info_span!("tryon_pipeline", generation_id = %generation_id);
        let result = self.process(generation_id).instrument(span).await;

        if let Err(err) = result {
            tracing::error!(generation_id = %generation_id, error = %err, "Try-on processing failed");
            self.record_failure(generation_id, err.to_string()).await;
        }
    }

    async fn process(&self, generation_id: Uuid) -> Result<(), TryOnError> {
        let mut generation = self
            .services
            .store
            .get(generation_id)
            .await?
            .ok_or(TryOnError::Missing)?;

        self.advance(&mut generation, GenerationProject::start_processing)
            .await?;
        let started = Instant::now();
        let live = self.services.mode.use_real_apis();
        tracing::info!(live, "Starting virtual try-on generation");

        let model_image_url = self.model_image(&generation, live).await;
        let generated_url = if live {
            self.dress_model(&generation, &model_image_url).await?
        } else {
            model_image_url
        };

        generation.set_generated(generated_url.clone(), started.elapsed().as_secs_f64());
        self.persist(&generation).await?;

        if generation.enhance {
            self.advance(&mut generation, GenerationProject::begin_enhancing)
                .await?;
            tokio::time::sleep(self.timings.enhance).await;
            generation.set_enhanced(generated_url);
            self.persist(&generation).await?;
        }

        if generation.generate_video {
            tokio::time::sleep(self.timings.video).await;
            generation.set_video(SAMPLE_VIDEO_URL.to_string());
            self.persist(&generation).await?;
        }

        self.advance(&mut generation, GenerationProject::complete)
            .await?;
        tracing::info!("Virtual try-on completed");
        Ok(())
    }

    /// Template, then each image model in priority order, then the curated database
    async fn model_image(&self, generation: &GenerationProject, live: bool) -> String {
        if let Some(template) = &generation.template_image_url {
            tracing::info!("Using custom template image");
            return template.clone();
        }
        if !live {
            return curated_model(generation);
        }
        if !self.services.replicate.is_configured() {
            tracing::warn!("Replicate is not configured, using curated model photo");
            return curated_model(generation);
        }

        let request_for = |model| ModelGenerationRequest {
            prompt: build_model_prompt(
                &generation.model_options,
                generation.clothing_type.as_str(),
                generation.camera_options.angle,
                generation.custom_instructions.as_deref(),
            ),
            aspect_ratio: generation.camera_options.aspect_ratio().to_string(),
            model,
        };

        for model in ImageModel::PRIORITY {
            match generate_model_image(self.services.replicate.as_ref(), &request_for(model)).await
            {
                Ok(image) => {
                    tracing::info!(model = %model, "Generated model image");
                    return image.image_url;
                }
                Err(err) => {
                    tracing::warn!(model = %model, error = %err, "Model generation failed")
                }
            }
        }

        tracing::warn!("All image models failed, falling back to curated model database");
        curated_model(generation)
    }

    async fn dress_model(
        &self,
        generation: &GenerationProject,
        model_image_url: &str,
    ) -> Result<String, TryOnError> {
        if !self.services.replicate.is_configured() {
            return Err(TryOnError::NotConfigured);
        }
        let image = virtual_try_on(
            self.services.replicate.as_ref(),
            &generation.clothing_image_url,
            model_image_url,
            generation.clothing_type.as_str(),
        )
        .await
        .map_err(TryOnError::TryOn)?;
        Ok(image.image_url)
    }

    async fn advance<F>(
        &self,
        generation: &mut GenerationProject,
        transition: F,
    ) -> Result<(), TryOnError>
    where
        F: FnOnce(&mut GenerationProject) -> showreel_common::Result<()>,
    {
        let old = generation.status;
        transition(generation)?;
        self.persist(generation).await?;
        log_status_change(generation, old);
        Ok(())
    }

    /// Write back without recreating a generation deleted mid-run
    async fn persist(&self, generation: &GenerationProject) -> Result<(), TryOnError> {
        if !self.services.store.update(generation).await? {
            return Err(TryOnError::Missing);
        }
        Ok(())
    }

    async fn record_failure(&self, generation_id: Uuid, message: String) {
        let mut generation = match self.services.store.get(generation_id).await {
            Ok(Some(generation)) if !generation.is_terminal() => generation,
            Ok(_) => return,
            Err(err) => {
                tracing::error!(generation_id = %generation_id, error = %err, "Failed to load generation to record failure");
                return;
            }
        };

        let old = generation.status;
        if let Err(err) = generation.fail(message) {
            tracing::error!(generation_id = %generation_id, error = %err, "Failed to mark generation as errored");
            return;
        }
        match self.services.store.update(&generation).await {
            Ok(true) => log_status_change(&generation, old),
            Ok(false) => {}
            Err(err) => {
                tracing::error!(generation_id = %generation_id, error = %err, "Failed to save generation error")
            }
        }
    }
}

fn curated_model(generation: &GenerationProject) -> String {
    select_model_photo(
        &generation.model_options,
        generation.camera_options.angle,
        &mut rand::thread_rng(),
    )
}

fn log_status_change(generation: &GenerationProject, old: GenerationStatus) {
    tracing::info!(
        generation_id = %generation.id,
        "Generation {} status: {} → {}",
        generation.id,
        old,
        generation.status
    );
    if let (GenerationStatus::Error, Some(error)) = (generation.status, &generation.error) {
        tracing::error!(generation_id = %generation.id, error = %error, "Generation failed");
    }
}

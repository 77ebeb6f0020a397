//! Product video pipeline
//!
//! Drives a project through background removal, mannequin generation,
//! script writing, and video rendering. Each step re-reads the project
//! from the store, does its work against the live vendors or a
//! simulation, and writes the result back before the next step starts.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use showreel_clipdrop::{BackgroundRemovalService, ClipDropError};
use showreel_common::{
    ApiModeSwitch, Backoff, Error, PollPolicy, RecordStore, RepositoryError,
};
use showreel_llm::{CompletionRequest, LlmError, LlmMessage, LlmService};
use showreel_replicate::{run_prediction, ImageModel, PredictionService, ReplicateError};
use showreel_runway::{
    render_policy, video_prompt, wait_for_video, RenderError, RenderRequest, VideoRenderService,
};
use showreel_storage::{project_asset_path, AssetKind, ObjectStorage, StorageError};

use crate::domain::catalog::{self, MannequinGender};
use crate::domain::{MannequinImage, Project, ProjectStatus, Script};

/// Vendor services and state shared by every pipeline run
#[derive(Clone)]
pub struct PipelineServices {
    pub store: Arc<dyn RecordStore<Project>>,
    pub storage: Arc<dyn ObjectStorage>,
    pub background: Arc<dyn BackgroundRemovalService>,
    pub replicate: Arc<dyn PredictionService>,
    pub llm: Arc<dyn LlmService>,
    pub render: Arc<dyn VideoRenderService>,
    pub mode: Arc<ApiModeSwitch>,
}

/// Inclusive range a simulated step sleeps for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const fn millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// How long each simulated step takes
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationTimings {
    pub background: DelayRange,
    pub mannequin: DelayRange,
    pub script: DelayRange,
    pub video: DelayRange,
}

impl Default for SimulationTimings {
    fn default() -> Self {
        Self {
            background: DelayRange::millis(2000, 4000),
            mannequin: DelayRange::millis(4000, 8000),
            script: DelayRange::millis(2000, 4000),
            video: DelayRange::millis(5000, 10000),
        }
    }
}

impl SimulationTimings {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            background: DelayRange::millis(0, 0),
            mannequin: DelayRange::millis(0, 0),
            script: DelayRange::millis(0, 0),
            video: DelayRange::millis(0, 0),
        }
    }
}

/// Mannequin predictions: 1s, growing by 1s per poll up to 10s, 30 polls
pub fn mannequin_policy() -> PollPolicy {
    PollPolicy {
        max_attempts: 30,
        backoff: Backoff::Linear {
            initial: Duration::from_secs(1),
            step: Duration::from_secs(1),
            max: Duration::from_secs(10),
        },
    }
}

#[derive(Error, Debug)]
enum PipelineError {
    #[error(transparent)]
    ClipDrop(#[from] ClipDropError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Replicate(#[from] ReplicateError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Domain(#[from] Error),

    #[error("{0}")]
    InvalidScript(String),

    #[error("Project data missing after {0}")]
    MissingData(&'static str),

    #[error("Project was deleted during {0}")]
    Deleted(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Background,
    Mannequin,
    Script,
    Video,
}

impl Step {
    const ALL: [Step; 4] = [Step::Background, Step::Mannequin, Step::Script, Step::Video];

    fn name(&self) -> &'static str {
        match self {
            Step::Background => "BACKGROUND",
            Step::Mannequin => "MANNEQUIN",
            Step::Script => "SCRIPT",
            Step::Video => "VIDEO",
        }
    }

    fn activity(&self) -> &'static str {
        match self {
            Step::Background => "background removal",
            Step::Mannequin => "mannequin generation",
            Step::Script => "script generation",
            Step::Video => "video rendering",
        }
    }

    fn failure_message(&self, err: &PipelineError) -> String {
        if let PipelineError::MissingData(_) = err {
            return err.to_string();
        }
        let prefix = match self {
            Step::Background => "Background removal failed",
            Step::Mannequin => "Mannequin generation failed",
            Step::Script => "Script generation failed",
            Step::Video => "Video rendering failed",
        };
        format!("{}: {}", prefix, err)
    }
}

fn simulated_task_id() -> String {
    format!("simulated-task-{}", Utc::now().timestamp_millis())
}

/// Removes the project from the running set when the run ends
struct RunGuard {
    running: Arc<Mutex<HashSet<Uuid>>>,
    project_id: Uuid,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.project_id);
    }
}

/// Runs projects through the pipeline, at most one run per project
#[derive(Clone)]
pub struct ProjectPipeline {
    services: PipelineServices,
    timings: SimulationTimings,
    mannequin_policy: PollPolicy,
    render_policy: PollPolicy,
    running: Arc<Mutex<HashSet<Uuid>>>,
}

impl ProjectPipeline {
    pub fn new(services: PipelineServices) -> Self {
        Self {
            services,
            timings: SimulationTimings::default(),
            mannequin_policy: mannequin_policy(),
            render_policy: render_policy(),
            running: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_timings(mut self, timings: SimulationTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_policies(mut self, mannequin: PollPolicy, render: PollPolicy) -> Self {
        self.mannequin_policy = mannequin;
        self.render_policy = render;
        self
    }

    pub fn services(&self) -> &PipelineServices {
        &self.services
    }

    pub fn is_running(&self, project_id: Uuid) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&project_id)
    }

    fn claim(&self, project_id: Uuid) -> Result<RunGuard, Error> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(project_id) {
            return Err(Error::Conflict(format!(
                "Pipeline already running for project {}",
                project_id
            )));
        }
        Ok(RunGuard {
            running: Arc::clone(&self.running),
            project_id,
        })
    }

    /// Start a background run for the project
    pub fn start(&self, project_id: Uuid) -> Result<tokio::task::JoinHandle<()>, Error> {
        let guard = self.claim(project_id)?;
        let pipeline = self.clone();

        Ok(tokio::spawn(async move {
            let _guard = guard;
            pipeline.execute(project_id).await;
        }))
    }

    /// Run the project to completion on the current task
    pub async fn run(&self, project_id: Uuid) -> Result<(), Error> {
        let _guard = self.claim(project_id)?;
        self.execute(project_id).await;
        Ok(())
    }

    async fn execute(&self, project_id: Uuid) {
        tracing::info!(
            project_id = %project_id,
            mode = %self.services.mode.mode(),
            "Starting project pipeline"
        );

        for step in Step::ALL {
            let span = tracing::info_span!("pipeline_step", project_id = %project_id, step = step.name());
            let started = Instant::now();

            let result = self.run_step(project_id, step).instrument(span).await;

            tracing::debug!(
                project_id = %project_id,
                step = step.name(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Step finished"
            );

            if let Err(PipelineError::Deleted(activity)) = &result {
                tracing::info!(project_id = %project_id, "Project deleted during {}, stopping", activity);
                return;
            }
            if let Err(err) = result {
                tracing::error!(project_id = %project_id, step = step.name(), error = %err, "Step failed");
                self.record_failure(project_id, step.failure_message(&err)).await;
                return;
            }
        }

        tracing::info!(project_id = %project_id, step = "COMPLETE", "Project completed successfully");
    }

    async fn run_step(&self, project_id: Uuid, step: Step) -> Result<(), PipelineError> {
        let live = self.services.mode.use_real_apis();
        tracing::info!(live, "Starting {}", step.activity());

        match step {
            Step::Background => self.remove_background(project_id, live).await,
            Step::Mannequin => self.create_mannequin(project_id, live).await,
            Step::Script => self.write_script(project_id, live).await,
            Step::Video => self.render_video(project_id, live).await,
        }
    }

    async fn remove_background(&self, project_id: Uuid, live: bool) -> Result<(), PipelineError> {
        let mut project = self.load(project_id, "upload").await?;
        self.advance(&mut project, Project::start_processing).await?;

        let transparent_url = if live {
            let original = self.services.storage.fetch(&project.original_image_url).await?;
            let png = self.services.background.remove_background(original).await?;
            let path = project_asset_path(project_id, AssetKind::Transparent, "transparent.png");
            self.services.storage.upload(&path, png, "image/png").await?
        } else {
            tokio::time::sleep(self.timings.background.sample()).await;
            project.original_image_url.clone()
        };

        self.update(project_id, Step::Background, |p| {
            p.set_transparent_image(transparent_url)
        })
        .await
    }

    async fn create_mannequin(&self, project_id: Uuid, live: bool) -> Result<(), PipelineError> {
        let mut project = self.load(project_id, "background removal").await?;
        if project.transparent_image_url.is_none() {
            return Err(PipelineError::MissingData("background removal"));
        }
        self.advance(&mut project, Project::begin_mannequin).await?;

        let mannequin = if live {
            self.generate_mannequin(&project).await
        } else {
            tokio::time::sleep(self.timings.mannequin.sample()).await;
            MannequinImage {
                url: catalog::placeholder_image(&project.product_type),
                task_id: Some(simulated_task_id()),
                photo_id: None,
            }
        };

        self.update(project_id, Step::Mannequin, |p| p.set_mannequin(mannequin))
            .await
    }

    /// Replicate first; any failure falls back to the curated catalog
    async fn generate_mannequin(&self, project: &Project) -> MannequinImage {
        if !self.services.replicate.is_configured() {
            tracing::warn!("Replicate is not configured, using curated mannequin photo");
            return curated_mannequin(&project.product_type);
        }

        match self.generate_with_replicate(project).await {
            Ok(mannequin) => mannequin,
            Err(err) => {
                tracing::warn!(error = %err, "Mannequin generation failed, using curated mannequin photo");
                curated_mannequin(&project.product_type)
            }
        }
    }

    async fn generate_with_replicate(
        &self,
        project: &Project,
    ) -> Result<MannequinImage, PipelineError> {
        let prompt = catalog::mannequin_prompt(&project.product_type, MannequinGender::Neutral);
        let seed: u32 = rand::thread_rng().gen_range(0..1_000_000);
        let input = serde_json::json!({
            "prompt": prompt,
            "seed": seed,
            "aspect_ratio": "3:4",
            "guidance": 3,
            "steps": 25,
            "output_format": "jpg",
        });

        let run = run_prediction(
            self.services.replicate.as_ref(),
            ImageModel::FluxPro.version(),
            input,
            &self.mannequin_policy,
        )
        .await?;

        let bytes = self.services.storage.fetch(&run.output_url).await?;
        let path = project_asset_path(project.id, AssetKind::Mannequin, "mannequin.jpg");
        let url = self.services.storage.upload(&path, bytes, "image/jpeg").await?;

        Ok(MannequinImage {
            url,
            task_id: Some(run.prediction_id),
            photo_id: None,
        })
    }

    async fn write_script(&self, project_id: Uuid, live: bool) -> Result<(), PipelineError> {
        let mut project = self.load(project_id, "mannequin generation").await?;
        if project.mannequin_image_url.is_none() {
            return Err(PipelineError::MissingData("mannequin generation"));
        }
        self.advance(&mut project, Project::begin_script).await?;

        let script = if live {
            let prompt = catalog::script_prompt(
                &project.product_name,
                &project.product_type,
                project.product_description.as_deref(),
            );
            let response = self
                .services
                .llm
                .complete(CompletionRequest {
                    system_prompt: Some(catalog::SCRIPT_SYSTEM_PROMPT.to_string()),
                    messages: vec![LlmMessage::user(prompt)],
                    max_tokens: Some(500),
                    temperature: Some(0.7),
                    json_response: true,
                    ..Default::default()
                })
                .await?;
            Script::from_completion(&response.content).map_err(PipelineError::InvalidScript)?
        } else {
            tokio::time::sleep(self.timings.script.sample()).await;
            catalog::placeholder_script(&project.product_name, &project.product_type)
        };

        self.update(project_id, Step::Script, |p| p.set_script(script))
            .await
    }

    async fn render_video(&self, project_id: Uuid, live: bool) -> Result<(), PipelineError> {
        let mut project = self.load(project_id, "script generation").await?;
        if project.script.is_none() {
            return Err(PipelineError::MissingData("script generation"));
        }
        self.advance(&mut project, Project::begin_rendering).await?;

        let video_url = if live {
            let composite = project
                .composite_image_url
                .clone()
                .ok_or(PipelineError::MissingData("script generation"))?;
            let image = self.services.storage.fetch(&composite).await?;
            let generation_id = self
                .services
                .render
                .submit(RenderRequest {
                    image,
                    prompt: video_prompt(&project.product_type).to_string(),
                })
                .await?;

            let recorded = generation_id.clone();
            self.update(project_id, Step::Video, |p| p.set_render_job(recorded))
                .await?;

            wait_for_video(
                self.services.render.as_ref(),
                &generation_id,
                &self.render_policy,
            )
            .await?
        } else {
            tokio::time::sleep(self.timings.video.sample()).await;
            self.update(project_id, Step::Video, |p| {
                p.set_render_job(simulated_task_id())
            })
            .await?;
            catalog::SAMPLE_VIDEO_URL.to_string()
        };

        let mut project = self.load(project_id, "video rendering").await?;
        self.advance(&mut project, |p| p.complete(video_url)).await
    }

    async fn load(&self, project_id: Uuid, after: &'static str) -> Result<Project, PipelineError> {
        self.services
            .store
            .get(project_id)
            .await?
            .ok_or(PipelineError::MissingData(after))
    }

    /// Apply a status transition, save, and log the change
    async fn advance<F>(&self, project: &mut Project, transition: F) -> Result<(), PipelineError>
    where
        F: FnOnce(&mut Project) -> showreel_common::Result<()>,
    {
        let old = project.status;
        transition(project)?;
        self.persist(project, project.status.label()).await?;
        log_status_change(project, old);
        Ok(())
    }

    /// Write back a project that may have been deleted since it was loaded
    async fn persist(&self, project: &Project, during: &'static str) -> Result<(), PipelineError> {
        if !self.services.store.update(project).await? {
            return Err(PipelineError::Deleted(during));
        }
        Ok(())
    }

    /// Re-read the project and store a step's output on it
    async fn update<F>(&self, project_id: Uuid, step: Step, apply: F) -> Result<(), PipelineError>
    where
        F: FnOnce(&mut Project),
    {
        let mut project = self.load(project_id, step.activity()).await?;
        apply(&mut project);
        self.persist(&project, step.activity()).await?;
        tracing::info!("{} completed", step.activity());
        Ok(())
    }

    async fn record_failure(&self, project_id: Uuid, message: String) {
        let mut project = match self.services.store.get(project_id).await {
            Ok(Some(project)) => project,
            Ok(None) => {
                tracing::warn!(project_id = %project_id, error = %message, "Project removed before failure could be recorded");
                return;
            }
            Err(err) => {
                tracing::error!(project_id = %project_id, error = %err, "Failed to load project to record failure");
                return;
            }
        };
        if project.is_terminal() {
            return;
        }

        let old = project.status;
        if let Err(err) = project.fail(message.clone()) {
            tracing::error!(project_id = %project_id, error = %err, "Failed to mark project as errored");
            return;
        }
        match self.services.store.update(&project).await {
            Ok(true) => log_status_change(&project, old),
            Ok(false) => {
                tracing::warn!(project_id = %project_id, "Project removed before failure could be recorded")
            }
            Err(err) => {
                tracing::error!(project_id = %project_id, error = %err, "Failed to save project error")
            }
        }
    }
}

fn curated_mannequin(product_type: &str) -> MannequinImage {
    let photo = catalog::select_mannequin(product_type, MannequinGender::Neutral);
    MannequinImage {
        url: photo.url(),
        task_id: None,
        photo_id: Some(photo.id.to_string()),
    }
}

fn log_status_change(project: &Project, old: ProjectStatus) {
    tracing::info!(
        project_id = %project.id,
        "Project {} status: {} → {}",
        project.id,
        old,
        project.status
    );
    if project.status == ProjectStatus::Error {
        if let Some(error) = &project.error {
            tracing::error!(project_id = %project.id, error = %error, "Project failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showreel_clipdrop::mock::MockClipDropService;
    use showreel_common::store::MemoryStore;
    use showreel_llm::mock::MockLlmService;
    use showreel_replicate::mock::MockReplicateService;
    use showreel_runway::mock::{MockOutcome, MockRenderService, MOCK_VIDEO_BASE_URL};
    use showreel_storage::mock::{MockStorage, MOCK_BASE_URL};

    use crate::domain::ProjectCreationParams;

    const ORIGINAL_URL: &str = "https://mock-storage.example.com/projects/original.png";

    struct Harness {
        pipeline: ProjectPipeline,
        store: Arc<MemoryStore<Project>>,
        storage: MockStorage,
        clipdrop: MockClipDropService,
        replicate: MockReplicateService,
        llm: MockLlmService,
        render: MockRenderService,
    }

    fn harness(live: bool) -> Harness {
        harness_with(live, MockReplicateService::new())
    }

    fn harness_with(live: bool, replicate: MockReplicateService) -> Harness {
        let store = Arc::new(MemoryStore::<Project>::new());
        let storage = MockStorage::new();
        let clipdrop = MockClipDropService::new();
        let llm = MockLlmService::new();
        let render = MockRenderService::new();

        let pipeline = ProjectPipeline::new(PipelineServices {
            store: store.clone(),
            storage: Arc::new(storage.clone()),
            background: Arc::new(clipdrop.clone()),
            replicate: Arc::new(replicate.clone()),
            llm: Arc::new(llm.clone()),
            render: Arc::new(render.clone()),
            mode: Arc::new(ApiModeSwitch::new(live)),
        })
        .with_timings(SimulationTimings::instant());

        Harness {
            pipeline,
            store,
            storage,
            clipdrop,
            replicate,
            llm,
            render,
        }
    }

    async fn seed(h: &Harness, product_type: &str) -> Uuid {
        let id = Uuid::new_v4();
        let project = Project::new(
            id,
            ProjectCreationParams {
                product_type: product_type.to_string(),
                product_name: "Sunset Tee".to_string(),
                product_description: None,
            },
            ORIGINAL_URL.to_string(),
        )
        .unwrap();
        h.store.save(&project).await.unwrap();
        h.storage.insert(ORIGINAL_URL, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        id
    }

    async fn stored(h: &Harness, id: Uuid) -> Project {
        h.store.get(id).await.unwrap().unwrap()
    }

    const VALID_SCRIPT: &str = r##"{"headline":"Wear The Sunset","bullets":["Soft","Bold","Lasting"],"cta":"Shop Now","colorPalette":["#F97316","#7C2D12","#FFEDD5"]}"##;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_run_uses_placeholders() {
        let h = harness(false);
        let id = seed(&h, "t-shirt").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.status, ProjectStatus::Complete);
        assert_eq!(project.transparent_image_url.as_deref(), Some(ORIGINAL_URL));
        assert_eq!(
            project.mannequin_image_url,
            Some(catalog::placeholder_image("t-shirt"))
        );
        assert!(project
            .mannequin_task_id
            .as_deref()
            .unwrap()
            .starts_with("simulated-task-"));
        assert_eq!(project.script.as_ref().unwrap().headline, "Style Meets Comfort");
        assert_eq!(project.composite_image_url, project.mannequin_image_url);
        assert!(project.overlay_filter.is_some());
        assert_eq!(project.video_url.as_deref(), Some(catalog::SAMPLE_VIDEO_URL));
        assert!(project.error.is_none());

        // no vendor was touched
        assert!(h.clipdrop.recorded_calls().is_empty());
        assert!(h.replicate.recorded_predictions().is_empty());
        assert!(h.llm.recorded_requests().is_empty());
        assert!(h.render.recorded_requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_run_calls_every_vendor() {
        let h = harness(true);
        h.llm.push_response(VALID_SCRIPT);
        let id = seed(&h, "hoodie").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.status, ProjectStatus::Complete, "{:?}", project.error);
        assert_eq!(
            project.transparent_image_url,
            Some(format!("{}/projects/{}/transparent/transparent.png", MOCK_BASE_URL, id))
        );
        assert_eq!(
            project.mannequin_image_url,
            Some(format!("{}/projects/{}/mannequin/mannequin.jpg", MOCK_BASE_URL, id))
        );
        assert!(project.mannequin_task_id.as_deref().unwrap().starts_with("mock-"));
        assert!(project.mannequin_photo_id.is_none());
        assert_eq!(project.script.as_ref().unwrap().headline, "Wear The Sunset");

        let generation_id = project.runway_generation_id.clone().unwrap();
        assert_eq!(
            project.video_url,
            Some(format!("{}/{}.mp4", MOCK_VIDEO_BASE_URL, generation_id))
        );

        assert_eq!(h.clipdrop.recorded_calls(), vec![4]);

        let predictions = h.replicate.recorded_predictions();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].version, ImageModel::FluxPro.version());
        assert!(predictions[0].input["prompt"]
            .as_str()
            .unwrap()
            .contains("wearing a plain white hoodie"));

        let requests = h.llm.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_response);
        assert_eq!(requests[0].max_tokens, Some(500));
        assert_eq!(requests[0].temperature, Some(0.7));

        let renders = h.render.recorded_requests();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].prompt, video_prompt("hoodie"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_failure_stops_pipeline() {
        let h = harness(true);
        h.clipdrop.set_failure(Some("quota exhausted".to_string()));
        let id = seed(&h, "mug").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.status, ProjectStatus::Error);
        assert_eq!(
            project.error.as_deref(),
            Some("Background removal failed: ClipDrop API error: quota exhausted")
        );
        assert!(project.transparent_image_url.is_none());
        assert!(h.replicate.recorded_predictions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mannequin_failure_falls_back_to_catalog() {
        let replicate = MockReplicateService::new();
        replicate
            .behavior()
            .fail_version(ImageModel::FluxPro.version(), "NSFW content detected");
        let h = harness_with(true, replicate);
        h.llm.push_response(VALID_SCRIPT);
        let id = seed(&h, "t-shirt").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.status, ProjectStatus::Complete);
        assert_eq!(project.mannequin_photo_id.as_deref(), Some("tshirt-neutral-1"));
        assert!(project.mannequin_task_id.is_none());
        assert_eq!(
            project.mannequin_image_url,
            Some(catalog::select_mannequin("t-shirt", MannequinGender::Neutral).url())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unconfigured_replicate_uses_catalog_without_calls() {
        let h = harness_with(true, MockReplicateService::unconfigured());
        h.llm.push_response(VALID_SCRIPT);
        let id = seed(&h, "poster").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.mannequin_photo_id.as_deref(), Some("poster-wall-1"));
        assert!(h.replicate.recorded_predictions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_script_is_reported() {
        let h = harness(true);
        h.llm.push_response(r#"{"headline":"Only a headline"}"#);
        let id = seed(&h, "t-shirt").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.status, ProjectStatus::Error);
        assert_eq!(
            project.error.as_deref(),
            Some("Script generation failed: Invalid script format: bullets must be an array of 3 items")
        );
        assert!(h.render.recorded_requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_timeout_keeps_generation_id() {
        let h = harness(true);
        h.llm.push_response(VALID_SCRIPT);
        h.render.behavior().set_outcome(MockOutcome::Timeout);
        let id = seed(&h, "tote bag").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.status, ProjectStatus::Error);
        assert_eq!(
            project.error.as_deref(),
            Some("Video rendering failed: Video generation timed out")
        );
        assert!(project.runway_generation_id.is_some());
        assert!(project.video_url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_failure_message() {
        let h = harness(true);
        h.llm.push_response(VALID_SCRIPT);
        h.render.behavior().set_outcome(MockOutcome::Fail);
        h.render.behavior().set_error_message("Content moderation");
        let id = seed(&h, "phone case").await;

        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(
            project.error.as_deref(),
            Some("Video rendering failed: Content moderation")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_conflicts_while_running() {
        let h = harness(false);
        let pipeline = h.pipeline.clone().with_timings(SimulationTimings::default());
        let id = seed(&h, "mug").await;

        let handle = pipeline.start(id).unwrap();
        assert!(pipeline.is_running(id));
        let err = pipeline.start(id).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        handle.await.unwrap();
        assert!(!pipeline.is_running(id));
        assert_eq!(stored(&h, id).await.status, ProjectStatus::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_during_run_is_not_undone() {
        let h = harness(false);
        let pipeline = h.pipeline.clone().with_timings(SimulationTimings::default());
        let id = seed(&h, "mug").await;

        let handle = pipeline.start(id).unwrap();
        // background removal sleeps at least 2s; delete while it waits
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(stored(&h, id).await.status, ProjectStatus::ProcessingBackground);
        assert!(h.store.delete(id).await.unwrap());

        handle.await.unwrap();
        assert!(h.store.get(id).await.unwrap().is_none());
        assert!(h.store.list().await.unwrap().is_empty());
        assert!(!pipeline.is_running(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_project_is_a_no_op() {
        let h = harness(false);
        h.pipeline.run(Uuid::new_v4()).await.unwrap();
        assert!(h.store.list().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_override_enables_live_vendors() {
        let h = harness(false);
        let id = seed(&h, "t-shirt").await;
        h.llm.push_response(VALID_SCRIPT);

        h.pipeline.services().mode.set_override(Some(true));
        h.pipeline.run(id).await.unwrap();

        let project = stored(&h, id).await;
        assert_eq!(project.status, ProjectStatus::Complete);
        assert_eq!(h.clipdrop.recorded_calls().len(), 1);
    }

    #[test]
    fn test_delay_range_sample_stays_in_bounds() {
        let range = DelayRange::millis(2000, 4000);
        for _ in 0..50 {
            let d = range.sample();
            assert!(d >= Duration::from_millis(2000) && d <= Duration::from_millis(4000));
        }
        assert_eq!(DelayRange::millis(0, 0).sample(), Duration::ZERO);
    }

    #[test]
    fn test_mannequin_policy_grows_linearly() {
        let policy = mannequin_policy();
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.backoff.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.backoff.delay_for(4), Duration::from_secs(5));
        assert_eq!(policy.backoff.delay_for(20), Duration::from_secs(10));
    }

    #[test]
    fn test_failure_message_prefixes() {
        let err = PipelineError::InvalidScript("Invalid script format: x".to_string());
        assert_eq!(
            Step::Script.failure_message(&err),
            "Script generation failed: Invalid script format: x"
        );
        let missing = PipelineError::MissingData("mannequin generation");
        assert_eq!(
            Step::Script.failure_message(&missing),
            "Project data missing after mannequin generation"
        );
    }
}

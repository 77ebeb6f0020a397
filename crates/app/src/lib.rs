//! ShowReel application composition root
//!
//! Builds the vendor services from the environment and composes the
//! domain routers into a single application.

pub mod mode;

use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use showreel_clipdrop::{BackgroundRemovalService, ClipDropConfig, ClipDropServiceFactory};
use showreel_common::{ApiModeSwitch, Config, StoreBackend};
use showreel_llm::{LlmConfig, LlmService, LlmServiceFactory};
use showreel_projects::{PipelineServices, ProjectPipeline, ProjectService, ProjectsState};
use showreel_replicate::{PredictionService, ReplicateConfig, ReplicateServiceFactory};
use showreel_runway::{RenderConfig, RenderServiceFactory, VideoRenderService};
use showreel_storage::{ObjectStorage, StorageConfig, StorageServiceFactory};
use showreel_tryon::{TryOnPipeline, TryOnService, TryOnServices, TryOnState};

/// Vendor services shared by both pipelines
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<dyn ObjectStorage>,
    pub background: Arc<dyn BackgroundRemovalService>,
    pub replicate: Arc<dyn PredictionService>,
    pub llm: Arc<dyn LlmService>,
    pub render: Arc<dyn VideoRenderService>,
    /// Served at `/files` when storage writes to the local disk
    pub files_dir: Option<PathBuf>,
}

impl AppServices {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let storage_config = StorageConfig::from_env()?;
        let files_dir =
            (storage_config.provider == "local").then(|| storage_config.local_dir.clone());
        let storage = StorageServiceFactory::create(storage_config)?;

        let background = ClipDropServiceFactory::create(ClipDropConfig::from_env()?)?;
        let replicate = ReplicateServiceFactory::create(ReplicateConfig::from_env()?)?;
        let llm = LlmServiceFactory::create(LlmConfig::from_env()?)?;
        let render = RenderServiceFactory::create(RenderConfig::from_env()?)?;

        Ok(Self {
            storage,
            background: Arc::from(background),
            replicate: Arc::from(replicate),
            llm: Arc::from(llm),
            render: Arc::from(render),
            files_dir,
        })
    }
}

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config) -> Result<Router, anyhow::Error> {
    let backend = StoreBackend::from_config(&config).await?;
    let services = AppServices::from_env()?;
    Ok(build_app(&config, &backend, services))
}

/// Compose the router from already-built services
pub fn build_app(config: &Config, backend: &StoreBackend, services: AppServices) -> Router {
    let mode = Arc::new(ApiModeSwitch::new(config.use_real_apis));
    tracing::info!(mode = %mode.mode(), "API mode initialised from environment");

    let projects_pipeline = ProjectPipeline::new(PipelineServices {
        store: backend.store(),
        storage: Arc::clone(&services.storage),
        background: Arc::clone(&services.background),
        replicate: Arc::clone(&services.replicate),
        llm: Arc::clone(&services.llm),
        render: Arc::clone(&services.render),
        mode: Arc::clone(&mode),
    });
    let projects_state = ProjectsState::new(ProjectService::new(projects_pipeline));

    let tryon_pipeline = TryOnPipeline::new(TryOnServices {
        store: backend.store(),
        storage: Arc::clone(&services.storage),
        replicate: Arc::clone(&services.replicate),
        mode: Arc::clone(&mode),
    });
    let tryon_state = TryOnState::new(TryOnService::new(tryon_pipeline));

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { BANNER }))
        .merge(mode::routes().with_state(mode))
        .merge(showreel_projects::routes().with_state(projects_state))
        .merge(showreel_tryon::routes().with_state(tryon_state));

    match services.files_dir {
        Some(dir) => app.nest_service("/files", ServeDir::new(dir)),
        None => app,
    }
}

const BANNER: &str = concat!("ShowReel API v", env!("CARGO_PKG_VERSION"));

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

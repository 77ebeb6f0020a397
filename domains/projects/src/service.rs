//! Project operations used by the HTTP layer

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;
use validator::Validate;

use showreel_common::{Error, ImageUpload, RecordStore, Result};
use showreel_storage::{project_asset_path, AssetKind, ObjectStorage};

use crate::domain::{Project, ProjectCreationParams};
use crate::pipeline::ProjectPipeline;

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn RecordStore<Project>>,
    storage: Arc<dyn ObjectStorage>,
    pipeline: ProjectPipeline,
}

impl ProjectService {
    pub fn new(pipeline: ProjectPipeline) -> Self {
        let services = pipeline.services();
        Self {
            store: Arc::clone(&services.store),
            storage: Arc::clone(&services.storage),
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &ProjectPipeline {
        &self.pipeline
    }

    /// Store the original image, save a pending project, and start the pipeline
    pub async fn create(
        &self,
        params: ProjectCreationParams,
        upload: ImageUpload,
    ) -> Result<Project> {
        params
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;
        upload.validate()?;

        let id = Uuid::new_v4();
        let path = project_asset_path(id, AssetKind::Original, &upload.clean_name());
        let original_url = self
            .storage
            .upload(&path, upload.bytes, &upload.content_type)
            .await?;

        let project = Project::new(id, params, original_url)?;
        self.store.save(&project).await?;
        tracing::info!(
            project_id = %id,
            product_type = %project.product_type,
            "Project created"
        );

        self.pipeline.start(id)?;
        Ok(project)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.store.get(id).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Project> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }

    /// Newest first
    pub async fn list(&self) -> Result<Vec<Project>> {
        Ok(self.store.list().await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(Error::NotFound("Project not found".to_string()));
        }
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await?;
        tracing::info!("All projects cleared");
        Ok(())
    }

    /// Snapshots of the project every `interval`, ending after a terminal
    /// status, when the project disappears, or after `max_snapshots`.
    pub fn watch(
        &self,
        id: Uuid,
        interval: Duration,
        max_snapshots: u32,
    ) -> impl futures_core::Stream<Item = Project> + Send + 'static {
        let store = Arc::clone(&self.store);

        async_stream::stream! {
            for _ in 0..max_snapshots {
                let project = match store.get(id).await {
                    Ok(Some(project)) => project,
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(project_id = %id, error = %err, "Stopping project watch");
                        break;
                    }
                };

                let done = project.is_terminal();
                yield project;
                if done {
                    break;
                }

                tokio::time::sleep(interval).await;
            }
        }
    }
}

//! Project API handlers

use std::time::Duration;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::sse::{Event, Sse},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use showreel_common::files::multipart_error;
use showreel_common::{read_image_field, Error, ImageUpload, Result};

use crate::api::middleware::ProjectsState;
use crate::domain::overlay;
use crate::domain::{Project, ProjectCreationParams};

/// 15 minutes at 1s intervals
const MAX_EVENT_ITERATIONS: u32 = 900;

/// Project with its progress label, as shown by the progress tracker
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub label: &'static str,
    pub progress: u8,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            label: project.status.label(),
            progress: project.status.progress_percent(),
            project,
        }
    }
}

/// Text overlay for a project's video
#[derive(Debug, Serialize)]
pub struct OverlayResponse {
    pub filters: Vec<String>,
    pub command: String,
}

/// Upload a product photo and start the pipeline
pub async fn create_project(
    State(state): State<ProjectsState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    let mut image: Option<ImageUpload> = None;
    let mut product_type = String::new();
    let mut product_name = String::new();
    let mut product_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => image = Some(read_image_field(field).await?),
            "productType" => product_type = field.text().await.map_err(multipart_error)?,
            "productName" => product_name = field.text().await.map_err(multipart_error)?,
            "productDescription" => {
                product_description = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| Error::Validation("Please select an image".to_string()))?;
    let params = ProjectCreationParams {
        product_type,
        product_name,
        product_description,
    };

    let project = state.projects.create(params, image).await?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

/// List all projects, newest first
pub async fn list_projects(
    State(state): State<ProjectsState>,
) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = state.projects.list().await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Get a single project by ID
pub async fn get_project(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>> {
    Ok(Json(state.projects.get(id).await?.into()))
}

pub async fn delete_project(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.projects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove every project
pub async fn clear_projects(State(state): State<ProjectsState>) -> Result<StatusCode> {
    state.projects.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Project status snapshots (SSE stream)
pub async fn project_events(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<
    Sse<impl futures_core::Stream<Item = std::result::Result<Event, std::convert::Infallible>>>,
> {
    // 404 up front rather than an empty stream
    state.projects.get(id).await?;

    let snapshots = state
        .projects
        .watch(id, Duration::from_secs(1), MAX_EVENT_ITERATIONS);

    let stream = async_stream::stream! {
        let mut sequence: u32 = 0;
        for await project in snapshots {
            sequence += 1;
            let status = project.status.to_string();
            let data = serde_json::to_string(&ProjectResponse::from(project))
                .unwrap_or_else(|_| "{}".to_string());

            yield Ok(Event::default()
                .id(format!("{}:{}", id, sequence))
                .event(status)
                .data(data));
        }
    };

    Ok(Sse::new(stream))
}

/// ffmpeg drawtext arguments for the project's script
pub async fn get_overlay(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OverlayResponse>> {
    let project = state.projects.get(id).await?;
    let script = project
        .script
        .as_ref()
        .ok_or_else(|| Error::Conflict("Project has no script yet".to_string()))?;

    Ok(Json(OverlayResponse {
        filters: overlay::drawtext_filters(script),
        command: overlay::ffmpeg_text_command(script),
    }))
}

//! Route definitions for Projects domain API

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use showreel_common::files::UPLOAD_BODY_LIMIT;

use super::handlers::projects;
use super::middleware::ProjectsState;

/// Create all Projects domain API routes
pub fn routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/projects",
            get(projects::list_projects)
                .post(projects::create_project)
                .delete(projects::clear_projects)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/v1/projects/{id}",
            get(projects::get_project).delete(projects::delete_project),
        )
        .route("/v1/projects/{id}/events", get(projects::project_events))
        .route("/v1/projects/{id}/overlay", get(projects::get_overlay))
}

//! Route definitions for Try-on domain API

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use showreel_common::files::UPLOAD_BODY_LIMIT;

use super::handlers::{generate, tryon};
use super::middleware::TryOnState;

/// Create all Try-on domain API routes
pub fn routes() -> Router<TryOnState> {
    Router::new()
        .route(
            "/v1/tryon",
            get(tryon::list_generations)
                .post(tryon::create_generation)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/v1/tryon/presets", get(tryon::get_presets))
        .route("/v1/tryon/{id}", get(tryon::get_generation))
        .route(
            "/v1/tryon/{id}/variations",
            post(tryon::generate_variations),
        )
        .route("/api/generate-model", post(generate::generate_model))
        .route("/api/virtual-tryon", post(generate::virtual_tryon))
}

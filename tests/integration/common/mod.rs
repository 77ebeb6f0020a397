//! Common test utilities and fixtures for integration tests
//!
//! Builds the composed application on mock vendors and an in-memory
//! record store, plus request helpers shared by the test modules.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::Value;

use showreel_app::{build_app, AppServices};
use showreel_clipdrop::mock::MockClipDropService;
use showreel_common::{Config, StoreBackend};
use showreel_llm::mock::MockLlmService;
use showreel_replicate::mock::MockReplicateService;
use showreel_runway::mock::MockRenderService;
use showreel_storage::mock::MockStorage;

pub const BOUNDARY: &str = "showreel-test-boundary";

/// Test application with handles to every mock vendor
#[allow(dead_code)]
pub struct TestApp {
    pub config: Config,
    pub storage: MockStorage,
    pub clipdrop: MockClipDropService,
    pub replicate: MockReplicateService,
    pub llm: MockLlmService,
    pub render: MockRenderService,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(MockReplicateService::new(), None)
    }

    /// Replicate without an API token
    #[allow(dead_code)]
    pub fn without_replicate_token() -> Self {
        Self::build(MockReplicateService::unconfigured(), None)
    }

    /// Local files served from `dir`
    #[allow(dead_code)]
    pub fn serving_files(dir: PathBuf) -> Self {
        Self::build(MockReplicateService::new(), Some(dir))
    }

    fn build(replicate: MockReplicateService, files_dir: Option<PathBuf>) -> Self {
        let config = Config {
            store_provider: "memory".to_string(),
            ..Config::default()
        };
        let storage = MockStorage::new();
        let clipdrop = MockClipDropService::new();
        let llm = MockLlmService::new();
        let render = MockRenderService::new();

        let services = AppServices {
            storage: Arc::new(storage.clone()),
            background: Arc::new(clipdrop.clone()),
            replicate: Arc::new(replicate.clone()),
            llm: Arc::new(llm.clone()),
            render: Arc::new(render.clone()),
            files_dir,
        };
        let router = build_app(&config, &StoreBackend::Memory, services);

        Self {
            config,
            storage,
            clipdrop,
            replicate,
            llm,
            render,
            router,
        }
    }

    /// Router clone for a single `oneshot` call
    pub fn test_router(&self) -> Router {
        self.router.clone()
    }
}

/// Helper: build a request with an optional JSON body
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// One part of a multipart form
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Helper: build a `multipart/form-data` POST
pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Helper: raw response body
pub async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Helper: parse response body as JSON Value
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

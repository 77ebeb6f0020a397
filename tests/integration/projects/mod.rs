//! Projects domain integration tests (PI-01 through PI-11)

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{
    body_bytes, json_request, multipart_request, parse_body, Part, TestApp, JPEG_BYTES,
};

/// Helper: create a project from a JPEG upload
async fn create_project(app: &TestApp, product_type: &str) -> (StatusCode, Value) {
    let req = multipart_request(
        "/v1/projects",
        &[
            Part::File {
                name: "image",
                file_name: "sunset tee.jpg",
                content_type: "image/jpeg",
                bytes: JPEG_BYTES,
            },
            Part::Text("productType", product_type),
            Part::Text("productName", "Sunset Tee"),
            Part::Text("productDescription", "Soft cotton tee"),
        ],
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

/// Helper: GET a project until it reaches a terminal status
async fn wait_for_terminal(app: &TestApp, id: &str) -> Value {
    for _ in 0..120 {
        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::GET,
                &format!("/v1/projects/{}", id),
                None,
            ))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        if body["status"] == "complete" || body["status"] == "error" {
            return body;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    panic!("project {} never finished", id);
}

mod test_project_creation {
    use super::*;

    /// PI-01: Upload returns 201 with a pending project
    #[tokio::test(start_paused = true)]
    async fn test_create_project_returns_201_pending() {
        let app = TestApp::new();

        let (status, body) = create_project(&app, "t-shirt").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["productName"], "Sunset Tee");
        assert_eq!(body["progress"], 10);
        assert!(body["originalImageUrl"]
            .as_str()
            .unwrap()
            .ends_with("sunset_tee.jpg"));
        assert_eq!(app.storage.recorded_uploads().len(), 1);
    }

    /// PI-02: Missing image is a validation error
    #[tokio::test]
    async fn test_create_project_without_image() {
        let app = TestApp::new();

        let req = multipart_request(
            "/v1/projects",
            &[
                Part::Text("productType", "mug"),
                Part::Text("productName", "Morning Mug"),
            ],
        );
        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Validation error: Please select an image");
    }

    /// PI-03: Non-image uploads are rejected before storage
    #[tokio::test]
    async fn test_create_project_rejects_gif() {
        let app = TestApp::new();

        let req = multipart_request(
            "/v1/projects",
            &[
                Part::File {
                    name: "image",
                    file_name: "anim.gif",
                    content_type: "image/gif",
                    bytes: b"GIF89a",
                },
                Part::Text("productType", "mug"),
                Part::Text("productName", "Morning Mug"),
            ],
        );
        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(app.storage.recorded_uploads().is_empty());
    }

    /// PI-11: A dot-only file name is stored under a safe name
    #[tokio::test(start_paused = true)]
    async fn test_create_project_with_dot_file_name() {
        let app = TestApp::new();

        let req = multipart_request(
            "/v1/projects",
            &[
                Part::File {
                    name: "image",
                    file_name: "..",
                    content_type: "image/png",
                    bytes: JPEG_BYTES,
                },
                Part::Text("productType", "mug"),
                Part::Text("productName", "Morning Mug"),
            ],
        );
        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let uploads = app.storage.recorded_uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].path.ends_with("/original/upload"));
    }
}

mod test_project_pipeline {
    use super::*;

    /// PI-04: Simulated pipeline runs to completion with placeholders
    #[tokio::test(start_paused = true)]
    async fn test_simulated_pipeline_completes() {
        let app = TestApp::new();
        let (_, created) = create_project(&app, "t-shirt").await;
        let id = created["id"].as_str().unwrap().to_string();

        let done = wait_for_terminal(&app, &id).await;

        assert_eq!(done["status"], "complete");
        assert_eq!(done["progress"], 100);
        assert!(done["videoUrl"].is_string());
        assert!(done["script"]["headline"].is_string());
        assert!(app.replicate.recorded_predictions().is_empty());
        assert!(app.render.recorded_requests().is_empty());
    }

    /// PI-05: Overlay is served once the script exists
    #[tokio::test(start_paused = true)]
    async fn test_overlay_after_completion() {
        let app = TestApp::new();
        let (_, created) = create_project(&app, "hoodie").await;
        let id = created["id"].as_str().unwrap().to_string();
        wait_for_terminal(&app, &id).await;

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::GET,
                &format!("/v1/projects/{}/overlay", id),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert!(!body["filters"].as_array().unwrap().is_empty());
        assert!(body["command"].as_str().unwrap().contains("drawtext"));
    }

    /// PI-06: Event stream ends with the terminal snapshot
    #[tokio::test(start_paused = true)]
    async fn test_events_stream_reports_completion() {
        let app = TestApp::new();
        let (_, created) = create_project(&app, "mug").await;
        let id = created["id"].as_str().unwrap().to_string();
        wait_for_terminal(&app, &id).await;

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::GET,
                &format!("/v1/projects/{}/events", id),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-type"].to_str().unwrap(),
            "text/event-stream"
        );
        let text = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(text.contains(&format!("{}:1", id)));
        assert!(text.contains("\"status\":\"complete\""));
    }

    /// PI-07: Events for an unknown project are a 404
    #[tokio::test]
    async fn test_events_for_missing_project() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::GET,
                &format!("/v1/projects/{}/events", Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

mod test_project_listing {
    use super::*;

    /// PI-08: List returns newest first
    #[tokio::test(start_paused = true)]
    async fn test_list_projects_newest_first() {
        let app = TestApp::new();
        let (_, first) = create_project(&app, "mug").await;
        std::thread::sleep(std::time::Duration::from_millis(5));
        let (_, second) = create_project(&app, "cap").await;

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/v1/projects", None))
            .await
            .unwrap();

        let body = parse_body(resp).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], second["id"]);
        assert_eq!(list[1]["id"], first["id"]);
    }

    /// PI-09: Delete removes the project, a second delete is a 404
    #[tokio::test(start_paused = true)]
    async fn test_delete_project() {
        let app = TestApp::new();
        let (_, created) = create_project(&app, "mug").await;
        let uri = format!("/v1/projects/{}", created["id"].as_str().unwrap());

        let resp = app
            .test_router()
            .oneshot(json_request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .test_router()
            .oneshot(json_request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, &uri, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    /// PI-10: Clear empties the collection
    #[tokio::test(start_paused = true)]
    async fn test_clear_projects() {
        let app = TestApp::new();
        create_project(&app, "mug").await;
        create_project(&app, "cap").await;

        let resp = app
            .test_router()
            .oneshot(json_request(Method::DELETE, "/v1/projects", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/v1/projects", None))
            .await
            .unwrap();
        assert!(parse_body(resp).await.as_array().unwrap().is_empty());
    }
}

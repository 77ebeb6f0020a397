//! Try-on domain integration tests (TI-01 through TI-10)

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use showreel_replicate::mock::MockOutcome;

use crate::common::{json_request, multipart_request, parse_body, Part, TestApp, JPEG_BYTES};

fn options() -> String {
    json!({
        "clothingType": "dress",
        "modelOptions": {
            "ethnicity": "asian",
            "bodyType": "slim",
            "age": "young",
            "gender": "female"
        },
        "backgroundOptions": {"type": "studio", "preset": "studio-white"},
        "cameraOptions": {"angle": "front", "zoom": "full-body"}
    })
    .to_string()
}

/// Helper: upload a garment with the given options JSON
async fn create_generation(app: &TestApp, options: &str) -> (StatusCode, Value) {
    let req = multipart_request(
        "/v1/tryon",
        &[
            Part::File {
                name: "clothingImage",
                file_name: "dress.jpg",
                content_type: "image/jpeg",
                bytes: JPEG_BYTES,
            },
            Part::Text("options", options),
        ],
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

async fn wait_for_terminal(app: &TestApp, id: &str) -> Value {
    for _ in 0..60 {
        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, &format!("/v1/tryon/{}", id), None))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        if body["status"] == "complete" || body["status"] == "error" {
            return body;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    panic!("generation {} never finished", id);
}

mod test_generation_flow {
    use super::*;

    /// TI-01: Upload returns 201 and the simulated run completes
    #[tokio::test(start_paused = true)]
    async fn test_create_generation_completes() {
        let app = TestApp::new();

        let (status, body) = create_generation(&app, &options()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["clothingType"], "dress");
        assert!(body["backgroundUrl"].is_string());

        let done = wait_for_terminal(&app, body["id"].as_str().unwrap()).await;
        assert_eq!(done["status"], "complete");
        assert!(done["generatedImageUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://images.unsplash.com/"));
        assert!(app.replicate.recorded_predictions().is_empty());
    }

    /// TI-02: Missing clothing image is a validation error
    #[tokio::test]
    async fn test_create_generation_without_clothing() {
        let app = TestApp::new();
        let opts = options();
        let req = multipart_request("/v1/tryon", &[Part::Text("options", &opts)]);

        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["message"], "Validation error: Please select a clothing image");
    }

    /// TI-03: Malformed options JSON is a validation error
    #[tokio::test]
    async fn test_create_generation_with_bad_options() {
        let app = TestApp::new();

        let (status, body) = create_generation(&app, r#"{"clothingType": "dress"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Validation error: Invalid options:"));
        assert!(app.storage.recorded_uploads().is_empty());
    }

    /// TI-04: Unknown generation is a 404
    #[tokio::test]
    async fn test_get_missing_generation() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::GET,
                &format!("/v1/tryon/{}", Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(parse_body(resp).await["error"]["message"], "Not found: Project not found");
    }

    /// TI-05: Variations return curated photos
    #[tokio::test(start_paused = true)]
    async fn test_generate_variations() {
        let app = TestApp::new();
        let (_, created) = create_generation(&app, &options()).await;

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::POST,
                &format!("/v1/tryon/{}/variations", created["id"].as_str().unwrap()),
                Some(json!({"count": 3})),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["variations"].as_array().unwrap().len(), 3);
    }

    /// TI-06: Presets expose model options, backgrounds, and demos
    #[tokio::test]
    async fn test_get_presets() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/v1/tryon/presets", None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert!(body["modelPresets"].is_object());
        assert_eq!(body["backgroundPresets"].as_array().unwrap().len(), 6);
        assert!(!body["demoItems"].as_array().unwrap().is_empty());
    }
}

mod test_one_off_endpoints {
    use super::*;

    /// TI-07: generate-model returns the success envelope
    #[tokio::test(start_paused = true)]
    async fn test_generate_model() {
        let app = TestApp::new();
        let prompt = "a".repeat(120);

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::POST,
                "/api/generate-model",
                Some(json!({"prompt": prompt})),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["success"], true);
        assert!(body["imageUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://mock-replicate.example.com/"));
        assert_eq!(body["metadata"]["prompt"].as_str().unwrap().len(), 103);
        assert_eq!(app.replicate.recorded_predictions().len(), 1);
    }

    /// TI-08: generate-model without a prompt is a 400
    #[tokio::test]
    async fn test_generate_model_requires_prompt() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::POST,
                "/api/generate-model",
                Some(json!({"aspectRatio": "1:1"})),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            parse_body(resp).await["error"]["message"],
            "Validation error: Missing required parameter: prompt"
        );
    }

    /// TI-09: Missing Replicate token is a 500 configuration error
    #[tokio::test]
    async fn test_generate_model_without_token() {
        let app = TestApp::without_replicate_token();

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::POST,
                "/api/generate-model",
                Some(json!({"prompt": "a model"})),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Configuration error: Replicate API token not configured"
        );
    }

    /// TI-10: virtual-tryon validates its inputs and reports vendor failures
    #[tokio::test(start_paused = true)]
    async fn test_virtual_tryon() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::POST,
                "/api/virtual-tryon",
                Some(json!({"clothingImageUrl": "https://cdn.example.com/c.png"})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let request = json!({
            "clothingImageUrl": "https://cdn.example.com/c.png",
            "modelImageUrl": "https://cdn.example.com/m.png",
            "clothingType": "dress"
        });
        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::POST,
                "/api/virtual-tryon",
                Some(request.clone()),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await["metadata"]["clothingType"], "dress");

        app.replicate
            .behavior()
            .set_outcome(MockOutcome::Fail("garment not detected".to_string()));
        let resp = app
            .test_router()
            .oneshot(json_request(Method::POST, "/api/virtual-tryon", Some(request)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}

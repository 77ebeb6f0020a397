//! Application-level route tests (AI-01 through AI-06)

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{body_bytes, json_request, parse_body, TestApp};

mod test_infrastructure_routes {
    use super::*;

    /// AI-01: Health check answers plain "OK"
    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/health", None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, b"OK");
    }

    /// AI-02: Root banner names the service and version
    #[tokio::test]
    async fn test_root_banner() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/", None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let text = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(text.starts_with("ShowReel API v"));
    }

    /// AI-03: Local storage directory is served under /files
    #[tokio::test]
    async fn test_files_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        std::fs::write(dir.path().join("projects/hello.txt"), b"hello").unwrap();
        let app = TestApp::serving_files(dir.path().to_path_buf());

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/files/projects/hello.txt", None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, b"hello");
    }
}

mod test_mode_switch {
    use super::*;

    /// AI-04: Mode defaults to the environment value (simulated)
    #[tokio::test]
    async fn test_get_mode_defaults_to_simulated() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/v1/mode", None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["mode"], "simulated");
        assert_eq!(body["useRealApis"], false);
        assert_eq!(body["override"], serde_json::Value::Null);
    }

    /// AI-05: PUT sets the override and it persists across requests
    #[tokio::test]
    async fn test_put_mode_sets_override() {
        let app = TestApp::new();

        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::PUT,
                "/v1/mode",
                Some(json!({"useRealApis": true})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await["mode"], "live");

        let resp = app
            .test_router()
            .oneshot(json_request(Method::GET, "/v1/mode", None))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body["useRealApis"], true);
        assert_eq!(body["override"], true);
    }

    /// AI-06: null clears the override
    #[tokio::test]
    async fn test_put_null_clears_override() {
        let app = TestApp::new();

        app.test_router()
            .oneshot(json_request(
                Method::PUT,
                "/v1/mode",
                Some(json!({"useRealApis": true})),
            ))
            .await
            .unwrap();
        let resp = app
            .test_router()
            .oneshot(json_request(
                Method::PUT,
                "/v1/mode",
                Some(json!({"useRealApis": null})),
            ))
            .await
            .unwrap();

        let body = parse_body(resp).await;
        assert_eq!(body["mode"], "simulated");
        assert_eq!(body["override"], serde_json::Value::Null);
    }
}

//! Runtime switch between live vendor calls and simulation

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use showreel_common::{ApiModeStatus, ApiModeSwitch};

/// `null` or a missing field clears the override
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeUpdate {
    #[serde(default)]
    pub use_real_apis: Option<bool>,
}

pub fn routes() -> Router<Arc<ApiModeSwitch>> {
    Router::new().route("/v1/mode", get(get_mode).put(set_mode))
}

async fn get_mode(State(mode): State<Arc<ApiModeSwitch>>) -> Json<ApiModeStatus> {
    Json(mode.status())
}

async fn set_mode(
    State(mode): State<Arc<ApiModeSwitch>>,
    Json(update): Json<ModeUpdate>,
) -> Json<ApiModeStatus> {
    mode.set_override(update.use_real_apis);
    Json(mode.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_update_accepts_null_and_missing() {
        let update: ModeUpdate = serde_json::from_value(json!({"useRealApis": null})).unwrap();
        assert_eq!(update.use_real_apis, None);

        let update: ModeUpdate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(update.use_real_apis, None);

        let update: ModeUpdate = serde_json::from_value(json!({"useRealApis": true})).unwrap();
        assert_eq!(update.use_real_apis, Some(true));
    }

    #[tokio::test]
    async fn test_set_mode_round_trips_through_switch() {
        let switch = Arc::new(ApiModeSwitch::new(false));

        let Json(status) = set_mode(
            State(Arc::clone(&switch)),
            Json(ModeUpdate {
                use_real_apis: Some(true),
            }),
        )
        .await;
        assert!(status.use_real_apis);
        assert_eq!(status.override_value, Some(true));

        let Json(status) = set_mode(State(Arc::clone(&switch)), Json(ModeUpdate::default())).await;
        assert!(!status.use_real_apis);
        assert_eq!(status.override_value, None);

        let Json(status) = get_mode(State(switch)).await;
        assert!(!status.env_default);
    }
}

//! Mock Prediction Service Implementation
//!
//! Programmable mock for testing model runs:
//! - `MockReplicateService`: scripted predictions with request recording
//! - `MockPredictionBehavior`: controls outcome, pending poll count, per-version failures
//! - `MockOutcome`: Succeed, Fail, or Stall

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::{Prediction, PredictionService, PredictionStatus, ReplicateError};

/// What outcome the mock should produce once pending polls are used up
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Succeed with the configured output (or a generated URL)
    #[default]
    Succeed,
    /// Fail with the given vendor error
    Fail(String),
    /// Stay in `processing` forever
    Stall,
}

/// Programmable behavior for the mock prediction service
#[derive(Debug, Clone)]
pub struct MockPredictionBehavior {
    pub outcome: Arc<RwLock<MockOutcome>>,
    pub pending_polls: Arc<RwLock<u32>>,
    pub output: Arc<RwLock<Option<serde_json::Value>>>,
    pub version_failures: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for MockPredictionBehavior {
    fn default() -> Self {
        Self {
            outcome: Arc::new(RwLock::new(MockOutcome::Succeed)),
            pending_polls: Arc::new(RwLock::new(1)),
            output: Arc::new(RwLock::new(None)),
            version_failures: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl MockPredictionBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.write().unwrap() = outcome;
    }

    /// Number of `processing` polls before the outcome is reported
    pub fn set_pending_polls(&self, polls: u32) {
        *self.pending_polls.write().unwrap() = polls;
    }

    pub fn set_output(&self, output: serde_json::Value) {
        *self.output.write().unwrap() = Some(output);
    }

    /// Fail only predictions created for `version`
    pub fn fail_version(&self, version: &str, message: &str) {
        self.version_failures
            .write()
            .unwrap()
            .insert(version.to_string(), message.to_string());
    }

    pub fn reset(&self) {
        *self.outcome.write().unwrap() = MockOutcome::Succeed;
        *self.pending_polls.write().unwrap() = 1;
        *self.output.write().unwrap() = None;
        self.version_failures.write().unwrap().clear();
    }

    pub fn get_outcome(&self) -> MockOutcome {
        self.outcome.read().unwrap().clone()
    }
}

/// A recorded prediction request for test assertions
#[derive(Debug, Clone)]
pub struct RecordedPrediction {
    pub id: String,
    pub version: String,
    pub input: serde_json::Value,
}

#[derive(Debug, Clone)]
struct ScriptedPrediction {
    remaining_polls: Option<u32>,
    settled: Prediction,
}

/// Mock prediction service with programmable behavior
#[derive(Debug, Clone)]
pub struct MockReplicateService {
    behavior: Arc<MockPredictionBehavior>,
    history: Arc<Mutex<Vec<RecordedPrediction>>>,
    predictions: Arc<Mutex<HashMap<String, ScriptedPrediction>>>,
    configured: bool,
}

impl Default for MockReplicateService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReplicateService {
    pub fn new() -> Self {
        Self::with_behavior(Arc::new(MockPredictionBehavior::new()))
    }

    pub fn with_behavior(behavior: Arc<MockPredictionBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
            predictions: Arc::new(Mutex::new(HashMap::new())),
            configured: true,
        }
    }

    /// Behave as if no API token were set
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn behavior(&self) -> &Arc<MockPredictionBehavior> {
        &self.behavior
    }

    pub fn recorded_predictions(&self) -> Vec<RecordedPrediction> {
        self.history.lock().unwrap().clone()
    }

    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl PredictionService for MockReplicateService {
    async fn create_prediction(
        &self,
        version: &str,
        input: serde_json::Value,
    ) -> Result<Prediction, ReplicateError> {
        let id = format!("mock-{}", uuid::Uuid::new_v4().simple());
        tracing::info!(prediction_id = %id, version, "Mock Replicate: prediction created");

        self.history.lock().unwrap().push(RecordedPrediction {
            id: id.clone(),
            version: version.to_string(),
            input,
        });

        let version_failure = self
            .behavior
            .version_failures
            .read()
            .unwrap()
            .get(version)
            .cloned();
        let outcome = match version_failure {
            Some(message) => MockOutcome::Fail(message),
            None => self.behavior.get_outcome(),
        };

        let settled = match &outcome {
            MockOutcome::Succeed => Prediction {
                id: id.clone(),
                status: PredictionStatus::Succeeded,
                output: Some(self.behavior.output.read().unwrap().clone().unwrap_or_else(
                    || {
                        serde_json::json!([format!(
                            "https://mock-replicate.example.com/outputs/{}.png",
                            id
                        )])
                    },
                )),
                error: None,
            },
            MockOutcome::Fail(message) => Prediction {
                id: id.clone(),
                status: PredictionStatus::Failed,
                output: None,
                error: Some(serde_json::Value::String(message.clone())),
            },
            MockOutcome::Stall => Prediction {
                id: id.clone(),
                status: PredictionStatus::Processing,
                output: None,
                error: None,
            },
        };

        let remaining_polls = match outcome {
            MockOutcome::Stall => None,
            _ => Some(*self.behavior.pending_polls.read().unwrap()),
        };

        let initial = if remaining_polls == Some(0) {
            settled.clone()
        } else {
            Prediction {
                id: id.clone(),
                status: PredictionStatus::Starting,
                output: None,
                error: None,
            }
        };

        self.predictions.lock().unwrap().insert(
            id,
            ScriptedPrediction {
                remaining_polls,
                settled,
            },
        );
        Ok(initial)
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateError> {
        let mut predictions = self.predictions.lock().unwrap();
        let scripted = predictions
            .get_mut(id)
            .ok_or_else(|| ReplicateError::Response(format!("Prediction {} not found", id)))?;

        match scripted.remaining_polls.as_mut() {
            Some(0) => Ok(scripted.settled.clone()),
            Some(remaining) => {
                *remaining -= 1;
                if *remaining == 0 {
                    Ok(scripted.settled.clone())
                } else {
                    Ok(Prediction {
                        id: id.to_string(),
                        status: PredictionStatus::Processing,
                        output: None,
                        error: None,
                    })
                }
            }
            None => Ok(scripted.settled.clone()),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_defaults_and_reset() {
        let behavior = MockPredictionBehavior::new();
        assert_eq!(behavior.get_outcome(), MockOutcome::Succeed);

        behavior.set_outcome(MockOutcome::Stall);
        behavior.set_pending_polls(9);
        behavior.fail_version("v", "nope");
        behavior.reset();

        assert_eq!(behavior.get_outcome(), MockOutcome::Succeed);
        assert_eq!(*behavior.pending_polls.read().unwrap(), 1);
        assert!(behavior.version_failures.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prediction_settles_after_pending_polls() {
        let mock = MockReplicateService::new();
        mock.behavior().set_pending_polls(2);

        let created = mock
            .create_prediction("v", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(created.status, PredictionStatus::Starting);

        let first = mock.get_prediction(&created.id).await.unwrap();
        assert_eq!(first.status, PredictionStatus::Processing);
        let second = mock.get_prediction(&created.id).await.unwrap();
        assert_eq!(second.status, PredictionStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_version_failure_only_hits_that_version() {
        let mock = MockReplicateService::new();
        mock.behavior().set_pending_polls(0);
        mock.behavior().fail_version("flux", "model offline");

        let failed = mock
            .create_prediction("flux", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(failed.status, PredictionStatus::Failed);
        assert_eq!(failed.error_message().as_deref(), Some("model offline"));

        let ok = mock
            .create_prediction("sdxl", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(ok.status, PredictionStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_unknown_prediction_id() {
        let mock = MockReplicateService::new();
        assert!(mock.get_prediction("nope").await.is_err());
    }

    #[test]
    fn test_unconfigured_mock() {
        assert!(!MockReplicateService::unconfigured().is_configured());
        assert!(MockReplicateService::new().is_configured());
    }
}

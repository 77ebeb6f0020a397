//! Create a prediction and wait for its output URL

use std::time::Duration;

use showreel_common::{poll_until, Backoff, PollError, PollPolicy, PollStatus};

use crate::{Prediction, PredictionService, PredictionStatus, ReplicateError};

const MAX_ATTEMPTS: u32 = 60;

/// Image generation: 1s for the first 3 polls, then 2s
pub fn generation_policy() -> PollPolicy {
    PollPolicy {
        max_attempts: MAX_ATTEMPTS,
        backoff: Backoff::Stepped {
            steps: vec![(3, Duration::from_secs(1))],
            otherwise: Duration::from_secs(2),
        },
    }
}

/// Try-on: 1s for the first 5 polls, 2s until 15, then 3s
pub fn tryon_policy() -> PollPolicy {
    PollPolicy {
        max_attempts: MAX_ATTEMPTS,
        backoff: Backoff::Stepped {
            steps: vec![(5, Duration::from_secs(1)), (15, Duration::from_secs(2))],
            otherwise: Duration::from_secs(3),
        },
    }
}

/// A settled, successful prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRun {
    pub prediction_id: String,
    pub output_url: String,
    /// Polls after creation
    pub attempts: u32,
}

/// Create a prediction, poll while it is starting or processing, and
/// return its validated output URL.
pub async fn run_prediction(
    service: &dyn PredictionService,
    version: &str,
    input: serde_json::Value,
    policy: &PollPolicy,
) -> Result<PredictionRun, ReplicateError> {
    let created = service.create_prediction(version, input).await?;
    let prediction_id = created.id.clone();

    let (prediction, attempts) = if created.status.is_pending() {
        let outcome = poll_until(policy, "replicate prediction", |_| {
            let id = prediction_id.clone();
            async move {
                let p = service.get_prediction(&id).await?;
                Ok::<_, ReplicateError>(if p.status.is_pending() {
                    PollStatus::Pending(p.status.to_string())
                } else {
                    PollStatus::Ready(p)
                })
            }
        })
        .await
        .map_err(|e| match e {
            PollError::Exhausted { attempts, .. } => ReplicateError::Timeout { attempts },
            PollError::Check(inner) => inner,
        })?;
        (outcome.value, outcome.attempts)
    } else {
        (created, 0)
    };

    match prediction.status {
        PredictionStatus::Succeeded => {
            let output_url = extract_output_url(&prediction)?;
            tracing::info!(prediction_id = %prediction_id, attempts, "Replicate prediction succeeded");
            Ok(PredictionRun {
                prediction_id,
                output_url,
                attempts,
            })
        }
        PredictionStatus::Failed | PredictionStatus::Canceled => Err(ReplicateError::Failed(
            prediction
                .error_message()
                .unwrap_or_else(|| "Unknown error".to_string()),
        )),
        other => Err(ReplicateError::Failed(format!(
            "prediction ended with status '{}'",
            other
        ))),
    }
}

/// Output is either a URL string or an array whose first element is one
pub fn extract_output_url(prediction: &Prediction) -> Result<String, ReplicateError> {
    let url = match &prediction.output {
        Some(serde_json::Value::String(url)) => url.clone(),
        Some(serde_json::Value::Array(items)) => match items.first() {
            Some(serde_json::Value::String(url)) => url.clone(),
            _ => {
                return Err(ReplicateError::UnexpectedOutput(
                    serde_json::Value::Array(items.clone()).to_string(),
                ))
            }
        },
        other => {
            return Err(ReplicateError::UnexpectedOutput(
                other
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "null".to_string()),
            ))
        }
    };

    if url.len() < 10 || !url.starts_with("http") {
        return Err(ReplicateError::InvalidOutput(url));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockOutcome, MockReplicateService};
    use serde_json::json;

    fn prediction(output: serde_json::Value) -> Prediction {
        Prediction {
            id: "p".to_string(),
            status: PredictionStatus::Succeeded,
            output: Some(output),
            error: None,
        }
    }

    #[test]
    fn test_policies_match_vendor_schedules() {
        let g = generation_policy();
        assert_eq!(g.max_attempts, 60);
        assert_eq!(g.backoff.delay_for(2), Duration::from_secs(1));
        assert_eq!(g.backoff.delay_for(3), Duration::from_secs(2));

        let t = tryon_policy();
        assert_eq!(t.backoff.delay_for(4), Duration::from_secs(1));
        assert_eq!(t.backoff.delay_for(5), Duration::from_secs(2));
        assert_eq!(t.backoff.delay_for(15), Duration::from_secs(3));
    }

    #[test]
    fn test_extract_output_string_and_array() {
        assert_eq!(
            extract_output_url(&prediction(json!("https://cdn.example.com/a.png"))).unwrap(),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            extract_output_url(&prediction(json!([
                "https://cdn.example.com/first.png",
                "https://cdn.example.com/second.png"
            ])))
            .unwrap(),
            "https://cdn.example.com/first.png"
        );
    }

    #[test]
    fn test_extract_output_rejects_other_shapes() {
        let err = extract_output_url(&prediction(json!({"image": "x"}))).unwrap_err();
        assert!(matches!(err, ReplicateError::UnexpectedOutput(_)));

        let err = extract_output_url(&prediction(json!([]))).unwrap_err();
        assert!(matches!(err, ReplicateError::UnexpectedOutput(_)));
    }

    #[test]
    fn test_extract_output_validates_url() {
        let err = extract_output_url(&prediction(json!("http://a"))).unwrap_err();
        assert!(matches!(err, ReplicateError::InvalidOutput(_)));

        let err = extract_output_url(&prediction(json!("ftp://cdn.example.com/a.png"))).unwrap_err();
        assert!(matches!(err, ReplicateError::InvalidOutput(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_prediction_polls_until_success() {
        let mock = MockReplicateService::new();
        mock.behavior().set_pending_polls(3);

        let run = run_prediction(&mock, "v1", json!({"prompt": "x"}), &generation_policy())
            .await
            .unwrap();

        assert_eq!(run.attempts, 3);
        assert!(run.output_url.starts_with("https://"));
        assert_eq!(mock.recorded_predictions()[0].version, "v1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_prediction_reports_vendor_failure() {
        let mock = MockReplicateService::new();
        mock.behavior()
            .set_outcome(MockOutcome::Fail("CUDA out of memory".to_string()));

        let err = run_prediction(&mock, "v1", json!({}), &generation_policy())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Generation failed: CUDA out of memory");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_prediction_times_out() {
        let mock = MockReplicateService::new();
        mock.behavior().set_outcome(MockOutcome::Stall);

        let policy = PollPolicy::fixed(4, Duration::from_secs(1));
        let err = run_prediction(&mock, "v1", json!({}), &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, ReplicateError::Timeout { attempts: 4 }));
    }

    /// Replays a fixed sequence of predictions: the first for create, the rest for polls
    struct Scripted {
        responses: std::sync::Mutex<std::collections::VecDeque<Prediction>>,
    }

    impl Scripted {
        fn new(responses: Vec<Prediction>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
            }
        }

        fn next(&self) -> Prediction {
            self.responses.lock().unwrap().pop_front().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl PredictionService for Scripted {
        async fn create_prediction(
            &self,
            _version: &str,
            _input: serde_json::Value,
        ) -> Result<Prediction, ReplicateError> {
            Ok(self.next())
        }

        async fn get_prediction(&self, _id: &str) -> Result<Prediction, ReplicateError> {
            Ok(self.next())
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn with_status(status: PredictionStatus, error: Option<&str>) -> Prediction {
        Prediction {
            id: "p-canceled".to_string(),
            status,
            output: None,
            error: error.map(|e| json!(e)),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_prediction_canceled_uses_vendor_error() {
        let service = Scripted::new(vec![
            with_status(PredictionStatus::Starting, None),
            with_status(PredictionStatus::Canceled, Some("cancelled by user")),
        ]);

        let err = run_prediction(&service, "v1", json!({}), &generation_policy())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Generation failed: cancelled by user");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_prediction_canceled_without_error() {
        let service = Scripted::new(vec![
            with_status(PredictionStatus::Starting, None),
            with_status(PredictionStatus::Canceled, None),
        ]);

        let err = run_prediction(&service, "v1", json!({}), &generation_policy())
            .await
            .unwrap_err();
        assert!(matches!(&err, ReplicateError::Failed(msg) if msg == "Unknown error"));
    }

    #[tokio::test]
    async fn test_run_prediction_skips_polling_when_already_done() {
        let mock = MockReplicateService::new();
        mock.behavior().set_pending_polls(0);

        let run = run_prediction(&mock, "v1", json!({}), &generation_policy())
            .await
            .unwrap();
        assert_eq!(run.attempts, 0);
    }
}

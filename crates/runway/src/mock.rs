//! Mock Render Service Implementation
//!
//! Programmable mock for testing render workflows:
//! - `MockRenderService`: configurable mock with request recording
//! - `MockRenderBehavior`: controls outcome and pending poll count
//! - `MockOutcome`: Complete, Fail, or Timeout

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::{RenderError, RenderRequest, RenderStatus, VideoRenderService};

pub const MOCK_VIDEO_BASE_URL: &str = "https://mock-storage.example.com/renders";
pub const MOCK_FAILURE_MESSAGE: &str = "Mock render failure";

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Complete with a video URL
    #[default]
    Complete,
    /// Report FAILED with an error
    Fail,
    /// Stay PROCESSING forever
    Timeout,
}

/// Programmable behavior for the mock render service
#[derive(Debug, Clone)]
pub struct MockRenderBehavior {
    pub outcome: Arc<RwLock<MockOutcome>>,
    pub pending_polls: Arc<RwLock<u32>>,
    pub error_message: Arc<RwLock<Option<String>>>,
    pub video_url: Arc<RwLock<Option<String>>>,
    pub submit_failure: Arc<RwLock<Option<String>>>,
}

impl Default for MockRenderBehavior {
    fn default() -> Self {
        Self {
            outcome: Arc::new(RwLock::new(MockOutcome::Complete)),
            pending_polls: Arc::new(RwLock::new(1)),
            error_message: Arc::new(RwLock::new(None)),
            video_url: Arc::new(RwLock::new(None)),
            submit_failure: Arc::new(RwLock::new(None)),
        }
    }
}

impl MockRenderBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.write().unwrap() = outcome;
    }

    /// Status checks answered with PROCESSING before the outcome shows
    pub fn set_pending_polls(&self, polls: u32) {
        *self.pending_polls.write().unwrap() = polls;
    }

    pub fn set_error_message(&self, message: &str) {
        *self.error_message.write().unwrap() = Some(message.to_string());
    }

    pub fn set_video_url(&self, url: &str) {
        *self.video_url.write().unwrap() = Some(url.to_string());
    }

    /// Make `submit` itself fail
    pub fn set_submit_failure(&self, message: &str) {
        *self.submit_failure.write().unwrap() = Some(message.to_string());
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        *self.outcome.write().unwrap() = MockOutcome::Complete;
        *self.pending_polls.write().unwrap() = 1;
        *self.error_message.write().unwrap() = None;
        *self.video_url.write().unwrap() = None;
        *self.submit_failure.write().unwrap() = None;
    }

    pub fn get_outcome(&self) -> MockOutcome {
        self.outcome.read().unwrap().clone()
    }

    pub fn get_pending_polls(&self) -> u32 {
        *self.pending_polls.read().unwrap()
    }
}

/// A recorded render request for test assertions
#[derive(Debug, Clone)]
pub struct RecordedRenderRequest {
    pub generation_id: String,
    pub prompt: String,
    pub image_bytes: usize,
}

#[derive(Debug, Clone)]
struct Job {
    outcome: MockOutcome,
    remaining_polls: u32,
}

/// Mock render service with programmable behavior
#[derive(Debug, Clone)]
pub struct MockRenderService {
    behavior: Arc<MockRenderBehavior>,
    history: Arc<Mutex<Vec<RecordedRenderRequest>>>,
    jobs: Arc<Mutex<HashMap<String, Job>>>,
}

impl Default for MockRenderService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRenderService {
    pub fn new() -> Self {
        Self::with_behavior(Arc::new(MockRenderBehavior::new()))
    }

    pub fn with_behavior(behavior: Arc<MockRenderBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the shared behavior for external configuration
    pub fn behavior(&self) -> &Arc<MockRenderBehavior> {
        &self.behavior
    }

    pub fn recorded_requests(&self) -> Vec<RecordedRenderRequest> {
        self.history.lock().unwrap().clone()
    }

    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl VideoRenderService for MockRenderService {
    async fn submit(&self, request: RenderRequest) -> Result<String, RenderError> {
        if let Some(message) = self.behavior.submit_failure.read().unwrap().clone() {
            return Err(RenderError::Response(message));
        }

        let generation_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(generation_id = %generation_id, "Mock render: received render request");

        self.history.lock().unwrap().push(RecordedRenderRequest {
            generation_id: generation_id.clone(),
            prompt: request.prompt,
            image_bytes: request.image.len(),
        });
        self.jobs.lock().unwrap().insert(
            generation_id.clone(),
            Job {
                outcome: self.behavior.get_outcome(),
                remaining_polls: self.behavior.get_pending_polls(),
            },
        );

        Ok(generation_id)
    }

    async fn status(&self, generation_id: &str) -> Result<RenderStatus, RenderError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(generation_id).ok_or_else(|| {
            RenderError::Response(format!("Generation {} not found", generation_id))
        })?;

        if job.remaining_polls > 0 {
            job.remaining_polls -= 1;
            return Ok(RenderStatus::Processing);
        }

        Ok(match job.outcome {
            MockOutcome::Complete => RenderStatus::Completed {
                video_url: self
                    .behavior
                    .video_url
                    .read()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| format!("{}/{}.mp4", MOCK_VIDEO_BASE_URL, generation_id)),
            },
            MockOutcome::Fail => RenderStatus::Failed {
                error: self
                    .behavior
                    .error_message
                    .read()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| MOCK_FAILURE_MESSAGE.to_string()),
            },
            MockOutcome::Timeout => RenderStatus::Processing,
        })
    }
}

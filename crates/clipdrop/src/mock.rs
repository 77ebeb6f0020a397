//! Mock Background Removal Service
//!
//! Echoes the input image back, records call sizes, and can be programmed
//! to fail.

use std::sync::{Arc, Mutex, RwLock};

use crate::{BackgroundRemovalService, ClipDropError};

#[derive(Debug, Clone, Default)]
pub struct MockClipDropService {
    failure: Arc<RwLock<Option<String>>>,
    calls: Arc<Mutex<Vec<usize>>>,
}

impl MockClipDropService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following call with `message`; `None` restores success
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.write().unwrap() = message;
    }

    /// Input sizes of every call so far
    pub fn recorded_calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BackgroundRemovalService for MockClipDropService {
    async fn remove_background(&self, image: Vec<u8>) -> Result<Vec<u8>, ClipDropError> {
        tracing::info!(size = image.len(), "Mock ClipDrop: removing background");
        self.calls.lock().unwrap().push(image.len());

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(ClipDropError::Response(message));
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_and_records() {
        let mock = MockClipDropService::new();
        let out = mock.remove_background(vec![4, 5, 6]).await.unwrap();
        assert_eq!(out, vec![4, 5, 6]);
        assert_eq!(mock.recorded_calls(), vec![3]);
    }

    #[tokio::test]
    async fn test_mock_programmed_failure() {
        let mock = MockClipDropService::new();
        mock.set_failure(Some("500 - upstream down".to_string()));
        let err = mock.remove_background(vec![1]).await.unwrap_err();
        assert_eq!(err.to_string(), "ClipDrop API error: 500 - upstream down");
    }
}

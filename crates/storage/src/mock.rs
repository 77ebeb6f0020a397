//! Mock Storage Implementation
//!
//! In-memory object store with upload recording and programmable failure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::{ObjectStorage, StorageError};

pub const MOCK_BASE_URL: &str = "https://mock-storage.example.com";

/// A recorded upload for test assertions
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub path: String,
    pub content_type: String,
    pub size: usize,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    history: Arc<Mutex<Vec<RecordedUpload>>>,
    fail_uploads: Arc<RwLock<Option<String>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following upload fail with `message`; `None` restores success
    pub fn set_upload_failure(&self, message: Option<String>) {
        *self.fail_uploads.write().unwrap() = message;
    }

    pub fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.history.lock().unwrap().clone()
    }

    pub fn object(&self, url: &str) -> Option<Vec<u8>> {
        self.objects.read().unwrap().get(url).cloned()
    }

    /// Seed an object under an arbitrary URL
    pub fn insert(&self, url: &str, bytes: Vec<u8>) {
        self.objects.write().unwrap().insert(url.to_string(), bytes);
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if let Some(message) = self.fail_uploads.read().unwrap().clone() {
            return Err(StorageError::Response(message));
        }

        let url = format!("{}/{}", MOCK_BASE_URL, path);
        tracing::info!(path, size = bytes.len(), "Mock storage: stored object");

        self.history.lock().unwrap().push(RecordedUpload {
            path: path.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
            url: url.clone(),
        });
        self.objects.write().unwrap().insert(url.clone(), bytes);
        Ok(url)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        Ok(self
            .object(url)
            .unwrap_or_else(|| format!("mock-object:{}", url).into_bytes()))
    }
}

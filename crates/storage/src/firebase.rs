//! Firebase Storage REST Implementation
//!
//! Uploads through the Firebase Storage v0 REST endpoint
//! (`POST /v0/b/{bucket}/o?name={path}`) and builds token download URLs
//! from the returned `downloadTokens`.

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{fetch_remote, ObjectStorage, StorageConfig, StorageError};

const DEFAULT_BASE_URL: &str = "https://firebasestorage.googleapis.com";

/// Metadata returned by a successful upload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    download_tokens: Option<String>,
}

/// Firebase Storage service implementation
pub struct FirebaseStorage {
    client: Client,
    bucket: String,
    token: Option<String>,
    base_url: String,
}

impl FirebaseStorage {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let bucket = config.firebase_bucket.ok_or_else(|| {
            StorageError::Configuration(
                "FIREBASE_STORAGE_BUCKET is required for the firebase provider".to_string(),
            )
        })?;

        Ok(Self {
            client: Client::new(),
            bucket,
            token: config.firebase_token,
            base_url: config
                .firebase_base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// `{base}/v0/b/{bucket}/o/{encoded name}?alt=media&token={token}`
    pub fn download_url(&self, name: &str, token: Option<&str>) -> Result<String, StorageError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| StorageError::Configuration(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Configuration("Base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v0", "b", self.bucket.as_str(), "o", name]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(token) = token {
                query.append_pair("token", token);
            }
        }
        Ok(url.to_string())
    }
}

#[async_trait::async_trait]
impl ObjectStorage for FirebaseStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = format!("{}/v0/b/{}/o", self.base_url, self.bucket);
        let size = bytes.len();

        tracing::debug!(path, size, content_type, "Uploading object to Firebase Storage");

        let mut request = self
            .client
            .post(&url)
            .query(&[("name", path)])
            .header("content-type", content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(StorageError::Response(format!(
                "Firebase Storage returned {}: {}",
                status, error_body
            )));
        }

        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| StorageError::Response(format!("Failed to parse response: {}", e)))?;

        let download_url = self.download_url(&metadata.name, metadata.download_tokens.as_deref())?;
        tracing::info!(path, size, "Uploaded object to Firebase Storage");
        Ok(download_url)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        fetch_remote(&self.client, url).await
    }
}

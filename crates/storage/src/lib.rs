//! ShowReel Object Storage
//!
//! Stores uploaded and generated media and hands back public URLs:
//! - Firebase Storage REST upload for production
//! - Local directory served by the app under `/files`
//! - Mock storage for testing and development

pub mod firebase;
pub mod local;
pub mod mock;
pub mod paths;

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub use paths::{project_asset_path, tryon_asset_path, AssetKind, TryOnRole};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage request error: {0}")]
    Request(String),

    #[error("Storage response error: {0}")]
    Response(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for showreel_common::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Configuration(msg) => showreel_common::Error::Configuration(msg),
            other => showreel_common::Error::Storage(other.to_string()),
        }
    }
}

/// Object storage configuration
#[derive(Clone)]
pub struct StorageConfig {
    pub provider: String,
    pub firebase_bucket: Option<String>,
    pub firebase_token: Option<String>,
    pub firebase_base_url: Option<String>,
    pub local_dir: PathBuf,
    pub public_base_url: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("firebase_bucket", &self.firebase_bucket)
            .field("firebase_token", &self.firebase_token.as_ref().map(|_| "[REDACTED]"))
            .field("firebase_base_url", &self.firebase_base_url)
            .field("local_dir", &self.local_dir)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl StorageConfig {
    /// Create storage config from environment variables
    pub fn from_env() -> Result<Self, StorageError> {
        let provider = std::env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "local".to_string());
        let firebase_bucket = std::env::var("FIREBASE_STORAGE_BUCKET")
            .ok()
            .filter(|b| !b.is_empty());
        let firebase_token = std::env::var("FIREBASE_STORAGE_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        let firebase_base_url = std::env::var("FIREBASE_STORAGE_BASE_URL").ok();
        let local_dir = std::env::var("LOCAL_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/files"));
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            provider,
            firebase_bucket,
            firebase_token,
            firebase_base_url,
            local_dir,
            public_base_url,
        })
    }
}

/// Object storage backend
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path` and return a public download URL
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Download the contents of any URL handed out by this service or a vendor
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StorageError>;
}

/// GET a remote URL and return the body
pub(crate) async fn fetch_remote(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, StorageError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| StorageError::Request(format!("Failed to fetch {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StorageError::Response(format!(
            "Fetching {} returned {}",
            url, status
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| StorageError::Response(format!("Failed to read body of {}: {}", url, e)))?;
    Ok(bytes.to_vec())
}

/// Factory for creating ObjectStorage implementations
pub struct StorageServiceFactory;

impl StorageServiceFactory {
    pub fn create(config: StorageConfig) -> Result<Arc<dyn ObjectStorage>, StorageError> {
        match config.provider.as_str() {
            "firebase" => {
                tracing::info!(bucket = ?config.firebase_bucket, "Creating Firebase storage service");
                Ok(Arc::new(firebase::FirebaseStorage::new(config)?))
            }
            "local" => {
                tracing::info!(dir = %config.local_dir.display(), "Creating local storage service");
                Ok(Arc::new(local::LocalStorage::new(
                    config.local_dir,
                    config.public_base_url,
                )))
            }
            "mock" => {
                tracing::info!("Creating mock storage service");
                Ok(Arc::new(mock::MockStorage::new()))
            }
            provider => Err(StorageError::Configuration(format!(
                "Unknown storage provider: {}. Supported providers: firebase, local, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> StorageConfig {
        StorageConfig {
            provider: provider.to_string(),
            firebase_bucket: None,
            firebase_token: None,
            firebase_base_url: None,
            local_dir: PathBuf::from("./data/files"),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }

    // ST-U01: Factory creates mock and local providers
    #[test]
    fn test_factory_mock_and_local_succeed() {
        assert!(StorageServiceFactory::create(config("mock")).is_ok());
        assert!(StorageServiceFactory::create(config("local")).is_ok());
    }

    // ST-U02: Firebase requires a bucket
    #[test]
    fn test_factory_firebase_requires_bucket() {
        let err = match StorageServiceFactory::create(config("firebase")) {
            Err(e) => e,
            Ok(_) => panic!("Expected error"),
        };
        assert!(err.to_string().contains("FIREBASE_STORAGE_BUCKET"));
    }

    // ST-U03: Factory rejects unknown provider
    #[test]
    fn test_factory_unknown_provider() {
        let err = match StorageServiceFactory::create(config("s3")) {
            Err(e) => e,
            Ok(_) => panic!("Expected error"),
        };
        assert!(err.to_string().contains("Unknown storage provider: s3"));
    }

    // ST-U04: Debug output redacts the token
    #[test]
    fn test_config_debug_redacts_token() {
        let mut c = config("firebase");
        c.firebase_token = Some("super-secret".to_string());
        let debug = format!("{:?}", c);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    // ST-U05: Storage errors map onto the application error
    #[test]
    fn test_storage_error_mapping() {
        let err: showreel_common::Error = StorageError::Response("boom".to_string()).into();
        assert!(matches!(err, showreel_common::Error::Storage(_)));

        let err: showreel_common::Error = StorageError::Configuration("no".to_string()).into();
        assert!(matches!(err, showreel_common::Error::Configuration(_)));
    }

    // ST-U06: Config defaults to the local provider
    #[test]
    #[serial_test::serial]
    fn test_config_from_env_defaults() {
        std::env::remove_var("STORAGE_PROVIDER");
        std::env::remove_var("LOCAL_STORAGE_DIR");
        let c = StorageConfig::from_env().unwrap();
        assert_eq!(c.provider, "local");
        assert_eq!(c.local_dir, PathBuf::from("./data/files"));
    }
}

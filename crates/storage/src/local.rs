//! Local directory storage
//!
//! Objects are written under a root directory and served by the app at
//! `{public_base_url}/files/{path}`.

use std::path::{Component, Path, PathBuf};

use reqwest::Client;

use crate::{fetch_remote, ObjectStorage, StorageError};

pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
    client: Client,
}

impl LocalStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_prefix(&self) -> String {
        format!("{}/files/", self.public_base_url)
    }

    /// Resolve a storage path under the root, rejecting traversal
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || path.is_empty() {
            return Err(StorageError::Request(format!(
                "Invalid storage path: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for LocalStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = bytes.len();
        tokio::fs::write(&target, bytes).await?;

        tracing::debug!(path, size, content_type, "Stored object locally");
        Ok(format!("{}{}", self.url_prefix(), path))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        if let Some(path) = url.strip_prefix(&self.url_prefix()) {
            let target = self.resolve(path)?;
            return Ok(tokio::fs::read(target).await?);
        }
        fetch_remote(&self.client, url).await
    }
}

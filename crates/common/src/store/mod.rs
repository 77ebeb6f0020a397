//! Record persistence for pipeline state
//!
//! Each pipeline keeps a single collection of records keyed by id.
//! Writes are whole-record upserts: the last write wins. Pipelines
//! write with `update`, which never brings back a deleted record.
//! Listing returns the newest record first.

mod file;
mod memory;
mod postgres;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Error;

/// Store-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::Io(e) => Error::Storage(e.to_string()),
            RepositoryError::InvalidData(msg) => Error::Internal(msg),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InvalidData(err.to_string())
    }
}

/// A persisted pipeline record
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name; also the file stem for the JSON file store
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    /// Status string, indexed by the Postgres store
    fn status_key(&self) -> String;
}

#[async_trait::async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// All records, newest first
    async fn list(&self) -> Result<Vec<T>, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Option<T>, RepositoryError>;

    /// Insert or replace the record with the same id
    async fn save(&self, record: &T) -> Result<(), RepositoryError>;

    /// Replace the record only if it still exists. Returns false, and
    /// writes nothing, when it has been deleted.
    async fn update(&self, record: &T) -> Result<bool, RepositoryError>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    async fn clear(&self) -> Result<(), RepositoryError>;
}

pub(crate) fn sort_newest_first<T: Record>(records: &mut [T]) {
    records.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
}

/// Backend chosen by `STORE_PROVIDER`, shared by every collection
#[derive(Clone)]
pub enum StoreBackend {
    Memory,
    File(PathBuf),
    Postgres(sqlx::PgPool),
}

impl std::fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "StoreBackend::Memory"),
            StoreBackend::File(dir) => write!(f, "StoreBackend::File({})", dir.display()),
            StoreBackend::Postgres(_) => write!(f, "StoreBackend::Postgres"),
        }
    }
}

impl StoreBackend {
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        match config.store_provider.as_str() {
            "memory" => {
                tracing::info!("Using in-memory record store");
                Ok(StoreBackend::Memory)
            }
            "file" => {
                tracing::info!(data_dir = %config.data_dir.display(), "Using JSON file record store");
                Ok(StoreBackend::File(config.data_dir.clone()))
            }
            "postgres" => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    Error::Configuration("DATABASE_URL is required for postgres store".to_string())
                })?;
                let pool = sqlx::PgPool::connect(url).await?;
                postgres::run_migrations(&pool).await?;
                tracing::info!("Using Postgres record store");
                Ok(StoreBackend::Postgres(pool))
            }
            provider => Err(Error::Configuration(format!(
                "Unknown store provider: {}. Supported providers: file, memory, postgres",
                provider
            ))),
        }
    }

    /// Open the store for one record type
    pub fn store<T: Record>(&self) -> Arc<dyn RecordStore<T>> {
        match self {
            StoreBackend::Memory => Arc::new(MemoryStore::<T>::new()),
            StoreBackend::File(dir) => Arc::new(JsonFileStore::<T>::new(dir.clone())),
            StoreBackend::Postgres(pool) => Arc::new(PgStore::<T>::new(pool.clone())),
        }
    }
}

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::{sort_newest_first, Record, RecordStore, RepositoryError};

/// One JSON array per collection at `{dir}/{COLLECTION}.json`.
///
/// Writes go to a temp file that is renamed over the original. A
/// missing, unreadable, or corrupt file reads as an empty collection.
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join(format!("{}.json", T::COLLECTION));
        Self {
            path,
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Vec<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read records, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to parse records, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write_all(&self, records: &[T]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(records)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<T: Record> RecordStore<T> for JsonFileStore<T> {
    async fn list(&self) -> Result<Vec<T>, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await;
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, RepositoryError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await.into_iter().find(|r| r.id() == id))
    }

    async fn save(&self, record: &T) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records).await
    }

    async fn update(&self, record: &T) -> Result<bool, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await;
        let Some(existing) = records.iter_mut().find(|r| r.id() == record.id()) else {
            return Ok(false);
        };
        *existing = record.clone();
        self.write_all(&records).await?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_all(&records).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

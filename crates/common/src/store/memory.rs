use std::collections::HashMap;
use std::marker::PhantomData;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sort_newest_first, Record, RecordStore, RepositoryError};

/// Process-local store; contents are lost on restart.
pub struct MemoryStore<T> {
    records: RwLock<HashMap<Uuid, T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn list(&self) -> Result<Vec<T>, RepositoryError> {
        let mut records: Vec<T> = self.records.read().await.values().cloned().collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, RepositoryError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn save(&self, record: &T) -> Result<(), RepositoryError> {
        self.records
            .write()
            .await
            .insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &T) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        self.records.write().await.clear();
        Ok(())
    }
}

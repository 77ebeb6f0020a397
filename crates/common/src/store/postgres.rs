use std::marker::PhantomData;

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Record, RecordStore, RepositoryError};

/// Run the record table migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::Connection(sqlx::Error::Migrate(Box::new(e))))
}

/// Records stored as JSONB rows in the shared `records` table
pub struct PgStore<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> PgStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

fn decode<T: Record>(value: serde_json::Value) -> Result<T, RepositoryError> {
    serde_json::from_value(value).map_err(|e| {
        RepositoryError::InvalidData(format!("Corrupt {} record: {}", T::COLLECTION, e))
    })
}

#[async_trait::async_trait]
impl<T: Record> RecordStore<T> for PgStore<T> {
    async fn list(&self) -> Result<Vec<T>, RepositoryError> {
        let rows: Vec<(Json<serde_json::Value>,)> = sqlx::query_as(
            r#"
            SELECT record FROM records
            WHERE collection = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(T::COLLECTION)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|(Json(v),)| decode(v)).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, RepositoryError> {
        let row: Option<(Json<serde_json::Value>,)> = sqlx::query_as(
            r#"
            SELECT record FROM records
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(Json(v),)| decode(v)).transpose()
    }

    async fn save(&self, record: &T) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(record)?;
        sqlx::query(
            r#"
            INSERT INTO records (collection, id, status, record, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (collection, id) DO UPDATE
            SET status = EXCLUDED.status,
                record = EXCLUDED.record,
                updated_at = NOW()
            "#,
        )
        .bind(T::COLLECTION)
        .bind(record.id())
        .bind(record.status_key())
        .bind(Json(value))
        .bind(record.created_at())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, record: &T) -> Result<bool, RepositoryError> {
        let value = serde_json::to_value(record)?;
        let result = sqlx::query(
            r#"
            UPDATE records
            SET status = $3, record = $4, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(record.id())
        .bind(record.status_key())
        .bind(Json(value))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(T::COLLECTION)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM records WHERE collection = $1")
            .bind(T::COLLECTION)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

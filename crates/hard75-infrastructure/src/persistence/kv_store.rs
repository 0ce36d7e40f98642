use async_trait::async_trait;
use log::debug;
use sqlx::SqlitePool;
use std::sync::Arc;

use hard75_domain::shared::DomainError;
use hard75_domain::storage::KeyValueStore;

use crate::ResultExt;

/// `KeyValueStore` over the `kv_store` SQLite table
pub struct SqliteKeyValueStore {
    pool: Arc<SqlitePool>,
}

impl SqliteKeyValueStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let query = "SELECT value FROM kv_store WHERE key = ?1";

        sqlx::query_scalar(query)
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .to_storage_err("Read key")
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = ?2,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#;

        sqlx::query(query)
            .bind(key)
            .bind(value)
            .execute(&*self.pool)
            .await
            .to_storage_err("Write key")?;

        debug!("[store] wrote key={} bytes={}", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let query = "DELETE FROM kv_store WHERE key = ?1";

        sqlx::query(query)
            .bind(key)
            .execute(&*self.pool)
            .await
            .to_storage_err("Remove key")?;

        Ok(())
    }
}

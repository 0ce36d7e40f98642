use std::sync::Arc;

use hard75_infrastructure::persistence::{Database, SqliteKeyValueStore};
use sqlx::SqlitePool;

/// Migrated private in-memory database
pub async fn setup_in_memory_db() -> SqlitePool {
    let db = Database::in_memory().await.expect("open in-memory db");
    db.run_migrations().await.expect("run migrations");
    db.pool().clone()
}

pub async fn setup_kv_store() -> (SqlitePool, SqliteKeyValueStore) {
    let pool = setup_in_memory_db().await;
    let store = SqliteKeyValueStore::new(Arc::new(pool.clone()));
    (pool, store)
}

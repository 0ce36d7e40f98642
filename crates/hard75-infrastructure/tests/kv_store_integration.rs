use std::sync::Arc;

use hard75_domain::storage::KeyValueStore;
use hard75_infrastructure::persistence::{Database, SqliteKeyValueStore};

mod test_helpers;

#[tokio::test]
async fn kv_store_upsert_get_remove_integration() {
    let (_pool, store) = test_helpers::setup_kv_store().await;

    assert_eq!(store.get("hard75:guest:days").await.expect("get"), None);

    store.set("hard75:guest:days", "{}").await.expect("insert");
    store
        .set("hard75:guest:days", r#"{"2025-04-01":{"complete":true}}"#)
        .await
        .expect("update");

    let value = store
        .get("hard75:guest:days")
        .await
        .expect("get")
        .expect("should exist");
    assert!(value.contains("2025-04-01"));

    store.remove("hard75:guest:days").await.expect("remove");
    store.remove("hard75:guest:days").await.expect("remove absent");
    assert_eq!(store.get("hard75:guest:days").await.expect("get"), None);
}

#[tokio::test]
async fn kv_store_keys_are_independent_integration() {
    let (_pool, store) = test_helpers::setup_kv_store().await;

    store.set("hard75:guest:days", "{}").await.expect("set");
    store.set("hard75:alice:days", r#"{"2025-04-01":{}}"#).await.expect("set");
    store.remove("hard75:guest:days").await.expect("remove");

    assert_eq!(store.get("hard75:guest:days").await.expect("get"), None);
    assert_eq!(
        store.get("hard75:alice:days").await.expect("get").as_deref(),
        Some(r#"{"2025-04-01":{}}"#)
    );
}

#[tokio::test]
async fn kv_store_survives_reopen_integration() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("hard75.db");
    let db_path = db_path.to_str().expect("utf8 path");

    {
        let db = Database::new(db_path).await.expect("open db");
        db.run_migrations().await.expect("migrate");
        let store = SqliteKeyValueStore::new(Arc::new(db.pool().clone()));
        store.set("hard75:lastUid", "alice").await.expect("set");
        db.pool().close().await;
    }

    let db = Database::new(db_path).await.expect("reopen db");
    db.run_migrations().await.expect("migrate again");
    let store = SqliteKeyValueStore::new(Arc::new(db.pool().clone()));

    assert_eq!(
        store.get("hard75:lastUid").await.expect("get").as_deref(),
        Some("alice")
    );
}

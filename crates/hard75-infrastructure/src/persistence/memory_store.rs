use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use hard75_domain::shared::DomainError;
use hard75_domain::storage::KeyValueStore;

/// Process-local `KeyValueStore`.
///
/// `set_read_only(true)` makes every write fail the way a full or disabled
/// browser storage would.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
    read_only: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Relaxed);
    }

    fn ensure_writable(&self) -> Result<(), DomainError> {
        if self.read_only.load(Ordering::Relaxed) {
            return Err(DomainError::Storage("Storage quota exceeded".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.ensure_writable()?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.ensure_writable()?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));

        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", "v").await.unwrap();
        store.set_read_only(true);

        let err = store.set("k", "w").await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}

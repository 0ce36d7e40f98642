use async_trait::async_trait;

use crate::shared::DomainError;

/// Durable string key-value layer the tracker persists into.
///
/// Implementations surface their own failures (quota, disabled storage) as
/// `DomainError::Storage`; callers decide whether to carry on without
/// persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}

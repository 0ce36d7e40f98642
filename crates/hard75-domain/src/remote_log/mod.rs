use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::day_record::DayKey;
use crate::identity::Identity;
use crate::namespace::Namespace;
use crate::shared::{DomainError, SubscriptionId};

/// Most recent remote records fetched per query
pub const REMOTE_LOG_LIMIT: usize = 100;

/// One day as held by the remote document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLogEntry {
    pub date: DayKey,
    pub complete: bool,
    /// Server-assigned; absent while the write is still pending
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Remote records together with the namespace they were fetched for.
///
/// Consumers must compare `namespace` with the active namespace before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRemoteLog {
    pub namespace: Namespace,
    pub subscription: SubscriptionId,
    /// Ordered by date, newest first
    pub entries: Vec<RemoteLogEntry>,
}

impl TaggedRemoteLog {
    pub fn new(
        namespace: Namespace,
        subscription: SubscriptionId,
        mut entries: Vec<RemoteLogEntry>,
    ) -> Self {
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(REMOTE_LOG_LIMIT);
        Self {
            namespace,
            subscription,
            entries,
        }
    }

    pub fn is_for(&self, namespace: &Namespace) -> bool {
        &self.namespace == namespace
    }

    pub fn entry(&self, date: DayKey) -> Option<&RemoteLogEntry> {
        self.entries.iter().find(|e| e.date == date)
    }
}

/// Live snapshots of a user's most recent remote records
pub type LogFeed = BoxStream<'static, Result<Vec<RemoteLogEntry>, DomainError>>;

/// Per-user remote collection of day records
#[async_trait]
pub trait RemoteLogStore: Send + Sync {
    /// Merge `date` and `complete` into the user's record for `date`,
    /// stamping `savedAt` with server time
    async fn write_day(
        &self,
        identity: &Identity,
        date: DayKey,
        complete: bool,
    ) -> Result<(), DomainError>;

    async fn delete_day(&self, identity: &Identity, date: DayKey) -> Result<(), DomainError>;

    /// Up to `limit` records, newest date first
    async fn fetch_recent(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> Result<Vec<RemoteLogEntry>, DomainError>;

    /// Ongoing feed of snapshots; each item replaces the previous one
    async fn watch(&self, identity: &Identity, limit: usize) -> Result<LogFeed, DomainError>;
}

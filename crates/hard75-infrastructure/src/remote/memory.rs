use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};

use hard75_domain::day_record::DayKey;
use hard75_domain::identity::Identity;
use hard75_domain::remote_log::{LogFeed, RemoteLogEntry, RemoteLogStore};
use hard75_domain::shared::{DomainError, UserId};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct Shared {
    logs: RwLock<HashMap<UserId, BTreeMap<DayKey, RemoteLogEntry>>>,
    failing: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
}

/// Process-local `RemoteLogStore` with push semantics.
///
/// Every write or delete is broadcast to the watchers of that user.
/// `set_failing(true)` makes every call error like an unreachable service.
#[derive(Clone)]
pub struct InMemoryRemoteLogStore {
    shared: Arc<Shared>,
    changes: broadcast::Sender<UserId>,
}

impl Default for InMemoryRemoteLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemoteLogStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared::default()),
            changes,
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::Relaxed);
    }

    /// Delay every fetch, to hold a read in flight across other events
    pub async fn set_fetch_delay(&self, delay: Option<Duration>) {
        *self.shared.fetch_delay.lock().await = delay;
    }

    /// Seed an entry directly, as another device would
    pub async fn insert(&self, uid: &UserId, entry: RemoteLogEntry) {
        self.shared
            .logs
            .write()
            .await
            .entry(uid.clone())
            .or_default()
            .insert(entry.date, entry);
        let _ = self.changes.send(uid.clone());
    }

    pub async fn entries_for(&self, uid: &UserId) -> Vec<RemoteLogEntry> {
        self.shared
            .logs
            .read()
            .await
            .get(uid)
            .map(|days| days.values().rev().cloned().collect())
            .unwrap_or_default()
    }

    fn ensure_available(&self) -> Result<(), DomainError> {
        if self.shared.failing.load(Ordering::Relaxed) {
            return Err(DomainError::Remote("Remote store unavailable".to_string()));
        }
        Ok(())
    }

    async fn snapshot(&self, uid: &UserId, limit: usize) -> Vec<RemoteLogEntry> {
        self.shared
            .logs
            .read()
            .await
            .get(uid)
            .map(|days| days.values().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RemoteLogStore for InMemoryRemoteLogStore {
    async fn write_day(
        &self,
        identity: &Identity,
        date: DayKey,
        complete: bool,
    ) -> Result<(), DomainError> {
        self.ensure_available()?;

        self.shared
            .logs
            .write()
            .await
            .entry(identity.uid.clone())
            .or_default()
            .insert(
                date,
                RemoteLogEntry {
                    date,
                    complete,
                    saved_at: Some(Utc::now()),
                },
            );

        debug!(
            "[sync] memory remote write uid={} date={} complete={}",
            identity.uid, date, complete
        );
        let _ = self.changes.send(identity.uid.clone());
        Ok(())
    }

    async fn delete_day(&self, identity: &Identity, date: DayKey) -> Result<(), DomainError> {
        self.ensure_available()?;

        let removed = self
            .shared
            .logs
            .write()
            .await
            .get_mut(&identity.uid)
            .and_then(|days| days.remove(&date))
            .is_some();

        if removed {
            let _ = self.changes.send(identity.uid.clone());
        }
        Ok(())
    }

    async fn fetch_recent(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> Result<Vec<RemoteLogEntry>, DomainError> {
        let delay = *self.shared.fetch_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.ensure_available()?;
        Ok(self.snapshot(&identity.uid, limit).await)
    }

    async fn watch(&self, identity: &Identity, limit: usize) -> Result<LogFeed, DomainError> {
        self.ensure_available()?;

        let receiver = self.changes.subscribe();
        let store = self.clone();
        let uid = identity.uid.clone();

        let feed = futures::stream::unfold(
            (store, uid, receiver),
            move |(store, uid, mut receiver)| async move {
                loop {
                    match receiver.recv().await {
                        Ok(changed) if changed != uid => continue,
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            let item = match store.ensure_available() {
                                Ok(()) => Ok(store.snapshot(&uid, limit).await),
                                Err(e) => Err(e),
                            };
                            return Some((item, (store, uid, receiver)));
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            },
        );

        Ok(feed.boxed())
    }
}

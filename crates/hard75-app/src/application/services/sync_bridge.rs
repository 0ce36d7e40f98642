use futures::StreamExt;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use hard75_domain::day_record::DayKey;
use hard75_domain::identity::Identity;
use hard75_domain::namespace::Namespace;
use hard75_domain::remote_log::{RemoteLogStore, TaggedRemoteLog};
use hard75_domain::shared::SubscriptionId;
use hard75_infrastructure::config::TimeoutConfig;

use crate::application::events::AppEvent;

/// Live remote feed for one namespace; aborted on drop
struct ActiveSubscription {
    id: SubscriptionId,
    namespace: Namespace,
    handle: JoinHandle<()>,
}

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

enum RemoteOp {
    Write {
        identity: Identity,
        date: DayKey,
        complete: bool,
    },
    Delete {
        identity: Identity,
        date: DayKey,
    },
    Flush(oneshot::Sender<()>),
}

struct Connection {
    remote: Arc<dyn RemoteLogStore>,
    ops: mpsc::UnboundedSender<RemoteOp>,
}

/// Mirrors local writes to the remote log and feeds remote snapshots back
/// as `RemoteLogUpdated` events.
///
/// Writes and deletes are queued to one writer task, so they reach the
/// remote in the order they were made and never hold up the caller. Every
/// remote failure is logged and swallowed. Without a remote store the bridge
/// is disabled and every hook is a no-op.
pub struct SyncBridge {
    connection: Option<Connection>,
    disabled_reason: Option<String>,
    log_limit: usize,
    subscription: Option<ActiveSubscription>,
}

impl SyncBridge {
    /// Must be called inside a tokio runtime; spawns the writer task
    pub fn new(remote: Arc<dyn RemoteLogStore>, timeouts: &TimeoutConfig) -> Self {
        let (ops, queue) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(remote.clone(), timeouts.remote_write, queue));

        Self {
            connection: Some(Connection { remote, ops }),
            disabled_reason: None,
            log_limit: timeouts.remote_log_limit,
            subscription: None,
        }
    }

    /// Local-only bridge; `reason` is shown once to the user when present
    pub fn disabled(reason: Option<String>) -> Self {
        Self {
            connection: None,
            disabled_reason: reason,
            log_limit: 0,
            subscription: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.connection.is_some()
    }

    /// Why sync is off, handed out once
    pub fn take_disabled_reason(&mut self) -> Option<String> {
        self.disabled_reason.take()
    }

    pub fn active_subscription(&self) -> Option<&SubscriptionId> {
        self.subscription.as_ref().map(|s| &s.id)
    }

    /// Whether `log` came from the live subscription for `namespace`
    pub fn accepts(&self, log: &TaggedRemoteLog, namespace: &Namespace) -> bool {
        log.is_for(namespace)
            && self
                .subscription
                .as_ref()
                .is_some_and(|s| s.id == log.subscription && &s.namespace == namespace)
    }

    /// Queue an upsert of `date`; no-op without an identity
    pub fn write_today_log(&self, identity: Option<&Identity>, date: DayKey, complete: bool) {
        if let Some(identity) = identity {
            self.enqueue(RemoteOp::Write {
                identity: identity.clone(),
                date,
                complete,
            });
        }
    }

    /// Queue a delete of `date`; no-op without an identity
    pub fn delete_today_log(&self, identity: Option<&Identity>, date: DayKey) {
        if let Some(identity) = identity {
            self.enqueue(RemoteOp::Delete {
                identity: identity.clone(),
                date,
            });
        }
    }

    /// Wait until every queued write and delete has been attempted
    pub async fn flush(&self) {
        let Some(connection) = &self.connection else {
            return;
        };
        let (ack, done) = oneshot::channel();
        if connection.ops.send(RemoteOp::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Replace the live subscription with one for `identity`.
    ///
    /// The task first sends an eager snapshot, then every feed update, each
    /// tagged with the identity's namespace and the new subscription id.
    pub fn subscribe_log(
        &mut self,
        identity: &Identity,
        events: mpsc::Sender<AppEvent>,
    ) -> Option<SubscriptionId> {
        self.cancel();
        let remote = self.connection.as_ref()?.remote.clone();

        let id = SubscriptionId::new();
        let namespace = identity.namespace();

        let handle = tokio::spawn(run_subscription(
            remote,
            identity.clone(),
            namespace.clone(),
            id.clone(),
            self.log_limit,
            events,
        ));

        info!("[sync] subscribed ns={} subscription={}", namespace, id);
        self.subscription = Some(ActiveSubscription {
            id: id.clone(),
            namespace,
            handle,
        });
        Some(id)
    }

    /// Drop the live subscription, if any
    pub fn cancel(&mut self) {
        if let Some(sub) = self.subscription.take() {
            info!(
                "[sync] unsubscribed ns={} subscription={}",
                sub.namespace, sub.id
            );
        }
    }

    fn enqueue(&self, op: RemoteOp) {
        if let Some(connection) = &self.connection {
            if connection.ops.send(op).is_err() {
                warn!("[sync] writer stopped, dropping remote update");
            }
        }
    }
}

async fn run_writer(
    remote: Arc<dyn RemoteLogStore>,
    timeout: Duration,
    mut queue: mpsc::UnboundedReceiver<RemoteOp>,
) {
    while let Some(op) = queue.recv().await {
        match op {
            RemoteOp::Write {
                identity,
                date,
                complete,
            } => match tokio::time::timeout(timeout, remote.write_day(&identity, date, complete))
                .await
            {
                Ok(Ok(())) => debug!(
                    "[sync] mirrored write uid={} date={} complete={}",
                    identity.uid, date, complete
                ),
                Ok(Err(e)) => warn!("[sync] remote write failed uid={}: {}", identity.uid, e),
                Err(_) => warn!(
                    "[sync] remote write timed out uid={} after {:?}",
                    identity.uid, timeout
                ),
            },
            RemoteOp::Delete { identity, date } => {
                match tokio::time::timeout(timeout, remote.delete_day(&identity, date)).await {
                    Ok(Ok(())) => {
                        debug!("[sync] mirrored delete uid={} date={}", identity.uid, date)
                    }
                    Ok(Err(e)) => warn!("[sync] remote delete failed uid={}: {}", identity.uid, e),
                    Err(_) => warn!(
                        "[sync] remote delete timed out uid={} after {:?}",
                        identity.uid, timeout
                    ),
                }
            }
            RemoteOp::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

async fn run_subscription(
    remote: Arc<dyn RemoteLogStore>,
    identity: Identity,
    namespace: Namespace,
    id: SubscriptionId,
    limit: usize,
    events: mpsc::Sender<AppEvent>,
) {
    let tag = |entries| {
        AppEvent::RemoteLogUpdated(TaggedRemoteLog::new(namespace.clone(), id.clone(), entries))
    };

    // Open the feed before the eager read so no change between the two is lost
    let feed = remote.watch(&identity, limit).await;

    match remote.fetch_recent(&identity, limit).await {
        Ok(entries) => {
            if events.send(tag(entries)).await.is_err() {
                return;
            }
        }
        Err(e) => warn!("[sync] eager fetch failed ns={}: {}", namespace, e),
    }

    let mut feed = match feed {
        Ok(feed) => feed,
        Err(e) => {
            warn!("[sync] live feed unavailable ns={}: {}", namespace, e);
            return;
        }
    };

    while let Some(update) = feed.next().await {
        match update {
            Ok(entries) => {
                if events.send(tag(entries)).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("[sync] live feed error ns={}: {}", namespace, e),
        }
    }

    debug!("[sync] feed ended ns={} subscription={}", namespace, id);
}

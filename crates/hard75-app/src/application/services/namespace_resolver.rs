use log::{info, warn};
use std::sync::Arc;

use hard75_domain::identity::Identity;
use hard75_domain::namespace::{Namespace, NamespaceTransition};

use super::record_store::RecordStore;

/// Tracks the active namespace from auth signals.
///
/// `current_namespace` answers from cached state only; before the first
/// signal of the visit it is guest.
pub struct NamespaceResolver {
    store: Arc<RecordStore>,
    active: Option<Namespace>,
}

impl NamespaceResolver {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            active: None,
        }
    }

    pub fn current_namespace(&self) -> Namespace {
        self.active.clone().unwrap_or_default()
    }

    /// Apply an auth signal: classify it against this visit and the last
    /// persisted identity, switch the active namespace, persist it.
    pub async fn resolve(&mut self, identity: Option<&Identity>) -> NamespaceTransition {
        let next = identity.map(Identity::namespace).unwrap_or_default();
        let last_seen = self.store.last_seen_namespace().await;
        let transition =
            NamespaceTransition::classify(self.active.as_ref(), last_seen.as_ref(), &next);

        if transition.changes_namespace() {
            info!(
                "[auth] namespace {} -> {} ({:?})",
                self.active
                    .as_ref()
                    .map(Namespace::as_str)
                    .unwrap_or("<none>"),
                next,
                transition
            );
        }

        if let Err(e) = self.store.remember_namespace(&next).await {
            warn!("[auth] could not persist last uid: {}", e);
        }
        self.active = Some(next);

        transition
    }
}

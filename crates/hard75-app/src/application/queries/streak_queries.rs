use log::{info, warn};
use std::sync::Arc;

use hard75_domain::day_record::DayKey;
use hard75_domain::namespace::Namespace;
use hard75_domain::streak::StreakEngine;

use super::day_view::DayView;
use crate::application::dtos::StreakDto;
use crate::application::services::RecordStore;

/// Streak numbers for the active view, ratcheting the stored longest value
pub struct StreakQueries {
    store: Arc<RecordStore>,
}

impl StreakQueries {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub async fn get_streak_stats(
        &self,
        namespace: &Namespace,
        view: &DayView,
        today: DayKey,
    ) -> StreakDto {
        let stored = self.store.stored_longest(namespace).await;
        let summary = StreakEngine::compute(&view.complete_set(), today, stored);

        if summary.raises_stored_longest() {
            if let Err(e) = self.store.ratchet_longest(namespace, summary.longest).await {
                warn!("[streak] could not persist longest ns={}: {}", namespace, e);
            }
        }

        let dto = StreakDto::from_summary(namespace, &summary);
        info!(
            "[streak] get_streak_stats ns={} source={:?} current={} longest={} total={}",
            dto.namespace,
            view.source(),
            dto.current_streak,
            dto.longest_streak,
            dto.total_complete_days
        );
        dto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hard75_domain::remote_log::RemoteLogEntry;
    use hard75_domain::storage::KeyValueStore;
    use hard75_infrastructure::persistence::InMemoryKeyValueStore;

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    fn remote_view(days: &[(&str, bool)]) -> DayView {
        let entries: Vec<RemoteLogEntry> = days
            .iter()
            .map(|(d, complete)| RemoteLogEntry {
                date: day(d),
                complete: *complete,
                saved_at: None,
            })
            .collect();
        DayView::from_remote(&entries)
    }

    #[tokio::test]
    async fn test_longest_is_persisted_and_never_lowered() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = Arc::new(RecordStore::new(kv.clone()));
        let queries = StreakQueries::new(store.clone());
        let ns = Namespace::user("alice");

        kv.set(&ns.longest_key(), "5").await.unwrap();

        let view = remote_view(&[("2025-04-01", true), ("2025-04-02", true)]);
        let dto = queries.get_streak_stats(&ns, &view, day("2025-04-02")).await;
        assert_eq!(dto.current_streak, 2);
        assert_eq!(dto.longest_streak, 5);
        assert_eq!(store.stored_longest(&ns).await, 5);
    }

    #[tokio::test]
    async fn test_new_record_raises_stored_longest() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = Arc::new(RecordStore::new(kv));
        let queries = StreakQueries::new(store.clone());
        let ns = Namespace::Guest;

        let view = remote_view(&[
            ("2025-04-01", true),
            ("2025-04-02", true),
            ("2025-04-03", false),
            ("2025-04-04", true),
        ]);
        let dto = queries.get_streak_stats(&ns, &view, day("2025-04-04")).await;

        assert_eq!(dto.current_streak, 1);
        assert_eq!(dto.longest_streak, 2);
        assert_eq!(dto.total_complete_days, 3);
        assert_eq!(dto.last_complete_date.as_deref(), Some("2025-04-04"));
        assert_eq!(store.stored_longest(&ns).await, 2);
    }

    #[tokio::test]
    async fn test_empty_view_keeps_stored_value() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = Arc::new(RecordStore::new(kv.clone()));
        let queries = StreakQueries::new(store);
        let ns = Namespace::Guest;
        kv.set(&ns.longest_key(), "9").await.unwrap();

        let dto = queries
            .get_streak_stats(&ns, &remote_view(&[]), day("2025-04-04"))
            .await;
        assert_eq!(dto.current_streak, 0);
        assert_eq!(dto.longest_streak, 9);
    }
}

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::application::events::AppEvent;

/// Periodic `RolloverCheck` ticker.
///
/// The ticker only sends events; the controller compares dates.
pub struct DayRolloverWatcher {
    interval: Duration,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl DayRolloverWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start ticking into `events`, replacing any running ticker
    pub async fn start(&self, events: mpsc::Sender<AppEvent>) {
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                debug!("[rollover] tick");
                if events.send(AppEvent::RolloverCheck).await.is_err() {
                    break;
                }
            }
        });

        if let Some(previous) = self.handle.lock().await.replace(handle) {
            previous.abort();
        }

        info!("[rollover] watcher started (every {:?})", interval);
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
            info!("[rollover] watcher stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_after_each_interval() {
        let (tx, mut rx) = mpsc::channel(8);
        let watcher = DayRolloverWatcher::new(Duration::from_secs(30));
        watcher.start(tx).await;

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.recv().await, Some(AppEvent::RolloverCheck));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(rx.recv().await, Some(AppEvent::RolloverCheck));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_aborts_ticker() {
        let (tx, mut rx) = mpsc::channel(8);
        let watcher = DayRolloverWatcher::new(Duration::from_secs(30));
        watcher.start(tx).await;
        assert!(watcher.is_running().await);

        watcher.stop().await;
        assert!(!watcher.is_running().await);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(rx.recv().await, None);
    }
}

mod config_service;
mod day_rollover;
mod namespace_resolver;
mod record_store;
mod session_service;
mod sync_bridge;

pub use config_service::{ConfigService, LogLevel, APP_CONFIG_FILE};
pub use day_rollover::DayRolloverWatcher;
pub use namespace_resolver::NamespaceResolver;
pub use record_store::RecordStore;
pub use session_service::{SessionService, SignInReport, POPUP_BLOCKED_NOTICE};
pub use sync_bridge::SyncBridge;

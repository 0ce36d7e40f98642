use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use hard75_domain::identity::IdentityProvider;
use hard75_domain::remote_log::RemoteLogStore;
use hard75_infrastructure::config::{Environment, RemoteConfigLoader, TimeoutConfig};
use hard75_infrastructure::identity::{FileSessionIdentityProvider, SimulatedFailure};
use hard75_infrastructure::logging;
use hard75_infrastructure::persistence::{Database, SqliteKeyValueStore};
use hard75_infrastructure::remote::{FirestoreLogStore, InMemoryRemoteLogStore};

use crate::application::services::{ConfigService, RecordStore, SessionService, SyncBridge};
use crate::presentation::cli::{Cli, Command, LoginArgs, RemoteKind};

pub const DB_FILENAME: &str = "hard75.db";

/// Everything a run of the tracker is wired with
pub struct Runtime {
    pub store: Arc<RecordStore>,
    pub sessions: Arc<SessionService>,
    pub sync: SyncBridge,
    pub timeouts: TimeoutConfig,
}

/// `--data-dir`, else the platform data dir (~/.local/share/hard75 on Linux)
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => dirs::data_dir()
            .map(|d| d.join("hard75"))
            .context("Failed to get app data directory")?,
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create app data directory {}", dir.display()))?;
    Ok(dir)
}

/// Settings live next to the data when `--data-dir` is given
pub fn resolve_config_dir(cli: &Cli, data_dir: &Path) -> PathBuf {
    match &cli.data_dir {
        Some(_) => data_dir.to_path_buf(),
        None => ConfigService::default_dir().unwrap_or_else(|| data_dir.to_path_buf()),
    }
}

/// File logging under `<data>/logs`, console-only when that fails
pub fn init_logging(data_dir: &Path, config: &ConfigService) {
    let log_dir = data_dir.join("logs");
    let filter = config.get_log_level().filter_directive();

    match logging::init_logger(log_dir.clone(), &filter) {
        Ok(_) => {
            info!("[app] hard75 {} starting", env!("CARGO_PKG_VERSION"));
            info!("[app] file logging at {}", log_dir.display());
        }
        Err(e) => {
            eprintln!("⚠️  Failed to initialize file logging: {}", e);
            eprintln!("   Falling back to console logging only");

            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
                )
                .with_target(true)
                .with_line_number(true)
                .try_init();
        }
    }
}

pub async fn build_runtime(cli: &Cli, data_dir: &Path) -> Result<Runtime> {
    let startup_started_at = Instant::now();
    let timeouts = TimeoutConfig::default();

    let started_at = Instant::now();
    let db_path = data_dir.join(DB_FILENAME);
    let db_path_str = db_path.to_str().context("Invalid database path")?;
    info!("[app] database path: {}", db_path_str);

    let db = Database::new(db_path_str).await?;
    db.run_migrations().await?;
    let kv = Arc::new(SqliteKeyValueStore::new(Arc::new(db.pool().clone())));
    let store = Arc::new(RecordStore::new(kv));
    info!(
        "[app] database ready ({}ms)",
        started_at.elapsed().as_millis()
    );

    let simulate = match &cli.command {
        Some(Command::Login(LoginArgs { simulate, .. })) => simulate.clone(),
        _ => None,
    };
    let sessions = Arc::new(SessionService::new(identity_provider(data_dir, simulate)));

    let started_at = Instant::now();
    let config_dir = resolve_config_dir(cli, data_dir);
    let sync = build_sync(cli, &config_dir, &timeouts).await;
    info!(
        "[app] sync {} ({}ms)",
        if sync.is_enabled() { "enabled" } else { "disabled" },
        started_at.elapsed().as_millis()
    );

    info!(
        "[app] runtime ready ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(Runtime {
        store,
        sessions,
        sync,
        timeouts,
    })
}

fn identity_provider(
    data_dir: &Path,
    simulate: Option<SimulatedFailure>,
) -> Arc<dyn IdentityProvider> {
    Arc::new(FileSessionIdentityProvider::new(data_dir).with_simulated_failure(simulate))
}

/// Remote backend for this run. Any failure leaves the tracker local-only
/// with the reason shown once.
async fn build_sync(cli: &Cli, config_dir: &Path, timeouts: &TimeoutConfig) -> SyncBridge {
    if cli.offline {
        info!("[sync] offline mode");
        return SyncBridge::disabled(None);
    }

    let remote: Arc<dyn RemoteLogStore> = match cli.remote {
        RemoteKind::Memory => Arc::new(InMemoryRemoteLogStore::new()),
        RemoteKind::Firestore => {
            let environment = Environment::detect(cli.env);
            let loader = RemoteConfigLoader::new(environment)
                .with_config_dir(config_dir)
                .with_http_timeout(timeouts.http_request);

            let store = match loader.load().await {
                Ok((config, source)) => {
                    info!(
                        "[sync] environment={} config source={:?}",
                        environment.as_str(),
                        source
                    );
                    FirestoreLogStore::new(config, timeouts)
                }
                Err(e) => Err(e),
            };

            match store {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    warn!("[sync] remote log unavailable: {}", e);
                    return SyncBridge::disabled(Some(e.message().to_string()));
                }
            }
        }
    };

    SyncBridge::new(remote, timeouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_offline_runtime_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "hard75",
            "--offline",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();

        let data_dir = resolve_data_dir(cli.data_dir.as_deref()).unwrap();
        let config_dir = resolve_config_dir(&cli, &data_dir);
        assert_eq!(config_dir, dir.path());

        let mut runtime = build_runtime(&cli, &data_dir).await.unwrap();

        assert!(dir.path().join(DB_FILENAME).exists());
        assert!(!runtime.sync.is_enabled());
        assert_eq!(runtime.sync.take_disabled_reason(), None);
    }

    #[tokio::test]
    async fn test_memory_remote_enables_sync() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["hard75", "--remote", "memory"]).unwrap();

        let sync = build_sync(&cli, dir.path(), &TimeoutConfig::default()).await;
        assert!(sync.is_enabled());
    }
}

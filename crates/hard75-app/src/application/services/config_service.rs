use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub const APP_CONFIG_FILE: &str = "app_config.json";

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// `EnvFilter` directive applying this level everywhere
    pub fn filter_directive(&self) -> String {
        hard75_infrastructure::logging::filter_for_level(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

/// Persistent configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AppConfig {
    #[serde(default)]
    log_level: LogLevel,
}

/// Application configuration service
pub struct ConfigService {
    log_level: Arc<AtomicU8>,
    config_path: PathBuf,
}

impl ConfigService {
    /// Load `app_config.json` from `config_dir`, creating the directory
    pub fn new(config_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(config_dir)?;
        let config_path = config_dir.join(APP_CONFIG_FILE);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str::<AppConfig>(&content).unwrap_or_else(|e| {
                warn!("[config] unreadable {:?}, using defaults: {}", config_path, e);
                AppConfig::default()
            })
        } else {
            AppConfig::default()
        };

        info!(
            "[config] loaded from {:?} log_level={}",
            config_path,
            config.log_level.as_str()
        );

        Ok(Self {
            log_level: Arc::new(AtomicU8::new(config.log_level as u8)),
            config_path,
        })
    }

    /// Platform config dir, e.g. `~/.config/hard75`
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hard75"))
    }

    pub fn get_log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.log_level.load(Ordering::Relaxed))
    }

    /// Set log level and persist to disk; applies from the next start
    pub fn set_log_level(&self, level: LogLevel) -> Result<()> {
        self.log_level.store(level as u8, Ordering::Relaxed);

        let config = AppConfig { log_level: level };
        let content = serde_json::to_string_pretty(&config)?;
        std::fs::write(&self.config_path, content)?;

        info!(
            "[config] log level {} saved to {:?}",
            level.as_str(),
            self.config_path
        );
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::from_u8(1), LogLevel::Error);
        assert_eq!(LogLevel::from_u8(3), LogLevel::Info);
        assert_eq!(LogLevel::from_u8(5), LogLevel::Trace);
        assert_eq!(LogLevel::from_u8(99), LogLevel::Info);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_set_log_level_persists() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(dir.path()).unwrap();
        assert_eq!(service.get_log_level(), LogLevel::Info);

        service.set_log_level(LogLevel::Debug).unwrap();

        let reloaded = ConfigService::new(dir.path()).unwrap();
        assert_eq!(reloaded.get_log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(APP_CONFIG_FILE), "{oops").unwrap();

        let service = ConfigService::new(dir.path()).unwrap();
        assert_eq!(service.get_log_level(), LogLevel::Info);
    }
}

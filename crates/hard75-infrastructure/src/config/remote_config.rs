use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use hard75_domain::shared::DomainError;

use super::environment::Environment;

pub const PROJECT_ID_VAR: &str = "HARD75_FIREBASE_PROJECT_ID";
pub const API_KEY_VAR: &str = "HARD75_FIREBASE_API_KEY";
pub const FIRESTORE_URL_VAR: &str = "HARD75_FIRESTORE_URL";
pub const HOSTING_URL_VAR: &str = "HARD75_HOSTING_URL";

pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1/";

pub const CONFIG_NOT_FOUND: &str =
    "Firebase config not found. Create firebase-config.<env>.json for local dev, or deploy to Firebase Hosting.";

/// Connection settings for the remote document store.
///
/// Deserializes from the hosting `init.json` shape (`projectId`, `apiKey`);
/// extra keys such as `authDomain` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    pub project_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Firestore REST root; an emulator URL in local setups
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_FIRESTORE_URL.to_string()
}

impl RemoteConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: None,
            base_url: default_base_url(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `projects/{p}/databases/(default)/documents`
    pub fn documents_root(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }
}

/// Where a remote config was found, for the startup log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Environment,
    File(PathBuf),
    Hosting(Url),
}

/// Resolves `RemoteConfig` from env vars, then a per-environment JSON file,
/// then the hosting init endpoint
pub struct RemoteConfigLoader {
    environment: Environment,
    config_dir: Option<PathBuf>,
    hosting_url: Option<Url>,
    http_timeout: Duration,
}

impl RemoteConfigLoader {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            config_dir: dirs::config_dir().map(|d| d.join("hard75")),
            hosting_url: std::env::var(HOSTING_URL_VAR)
                .ok()
                .and_then(|u| Url::parse(&u).ok()),
            http_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn with_hosting_url(mut self, url: Option<Url>) -> Self {
        self.hosting_url = url;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Config file path for the current environment
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| {
            d.join(format!(
                "firebase-config.{}.json",
                self.environment.config_suffix()
            ))
        })
    }

    pub async fn load(&self) -> Result<(RemoteConfig, ConfigSource), DomainError> {
        if let Some(config) = Self::from_env() {
            info!("[sync] remote config from environment project={}", config.project_id);
            return Ok((config, ConfigSource::Environment));
        }

        if let Some(path) = self.config_file() {
            match Self::from_file(&path) {
                Ok(Some(config)) => {
                    info!(
                        "[sync] remote config from file path={:?} project={}",
                        path, config.project_id
                    );
                    return Ok((config, ConfigSource::File(path)));
                }
                Ok(None) => debug!("[sync] no remote config file at {:?}", path),
                Err(e) => warn!("[sync] ignoring unreadable remote config {:?}: {}", path, e),
            }
        }

        if let Some(base) = &self.hosting_url {
            match self.fetch_hosting(base).await {
                Ok((config, url)) => {
                    info!("[sync] remote config from hosting url={}", url);
                    return Ok((config, ConfigSource::Hosting(url)));
                }
                Err(e) => warn!("[sync] hosting config fetch failed: {}", e),
            }
        }

        Err(DomainError::Config(CONFIG_NOT_FOUND.to_string()))
    }

    fn from_env() -> Option<RemoteConfig> {
        let project_id = std::env::var(PROJECT_ID_VAR).ok().filter(|v| !v.is_empty())?;
        let mut config = RemoteConfig::new(project_id);
        if let Ok(key) = std::env::var(API_KEY_VAR) {
            config = config.with_api_key(key);
        }
        if let Ok(url) = std::env::var(FIRESTORE_URL_VAR) {
            config = config.with_base_url(url);
        }
        Some(config)
    }

    fn from_file(path: &Path) -> Result<Option<RemoteConfig>, DomainError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let config = serde_json::from_str(&content)?;
        Ok(Some(config))
    }

    async fn fetch_hosting(&self, base: &Url) -> anyhow::Result<(RemoteConfig, Url)> {
        let url = base.join("/__/firebase/init.json")?;
        let client = Client::builder().timeout(self.http_timeout).build()?;
        let config = client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<RemoteConfig>()
            .await?;
        Ok((config, url))
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use hard75_domain::shared::DomainError;

pub const HOST_ENV_VAR: &str = "HARD75_HOST";
pub const ENV_OVERRIDE_VAR: &str = "HARD75_ENV";

const STAGING_HOSTS: [&str; 2] = ["hard75-staging.web.app", "hard75-staging.firebaseapp.com"];

/// Deployment the tracker talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Staging,
    #[default]
    Production,
}

impl Environment {
    /// Classify a hosting host name
    pub fn from_host(host: &str) -> Self {
        let host = host.trim().to_ascii_lowercase();
        let bare = host.split(':').next().unwrap_or_default();
        if host.contains("localhost") {
            Environment::Local
        } else if STAGING_HOSTS.contains(&bare) {
            Environment::Staging
        } else {
            Environment::Production
        }
    }

    /// Explicit override first, then `HARD75_ENV`, then `HARD75_HOST`
    pub fn detect(explicit: Option<Environment>) -> Self {
        if let Some(env) = explicit {
            return env;
        }
        if let Some(env) = std::env::var(ENV_OVERRIDE_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            return env;
        }
        std::env::var(HOST_ENV_VAR)
            .map(|h| Self::from_host(&h))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Suffix of the remote config file: only staging has its own project
    pub fn config_suffix(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Local | Environment::Production => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown environment: {}",
                other
            ))),
        }
    }
}

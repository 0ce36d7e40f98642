use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hard75_domain::identity::{Identity, IdentityProvider, SignInError, SignInMethod};
use hard75_domain::shared::DomainError;

use crate::ResultExt;

pub const SESSION_FILE: &str = "session.json";

/// Popup outcome to reproduce on the next popup sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedFailure {
    PopupBlocked,
    PopupClosed,
    Error(String),
}

impl FromStr for SimulatedFailure {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popup-blocked" => Ok(SimulatedFailure::PopupBlocked),
            "popup-closed" => Ok(SimulatedFailure::PopupClosed),
            other => match other.strip_prefix("error:") {
                Some(msg) => Ok(SimulatedFailure::Error(msg.to_string())),
                None => Err(DomainError::InvalidInput(format!(
                    "Unknown simulation '{}': expected popup-blocked, popup-closed or error:<msg>",
                    other
                ))),
            },
        }
    }
}

/// Identity provider that keeps the signed-in user in a JSON file.
///
/// The claim passed to `sign_in` is accepted as-is; there is no hosted
/// sign-in UI behind it.
pub struct FileSessionIdentityProvider {
    path: PathBuf,
    simulate: Option<SimulatedFailure>,
}

impl FileSessionIdentityProvider {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
            simulate: None,
        }
    }

    pub fn with_simulated_failure(mut self, failure: Option<SimulatedFailure>) -> Self {
        self.simulate = failure;
        self
    }

    fn check_simulation(&self, method: SignInMethod) -> Result<(), SignInError> {
        match (&self.simulate, method) {
            (Some(SimulatedFailure::PopupBlocked), SignInMethod::Popup) => {
                Err(SignInError::PopupBlocked)
            }
            (Some(SimulatedFailure::PopupClosed), SignInMethod::Popup) => {
                Err(SignInError::PopupClosedByUser)
            }
            (Some(SimulatedFailure::Error(msg)), _) => Err(SignInError::Other(msg.clone())),
            _ => Ok(()),
        }
    }

    async fn persist(&self, identity: &Identity) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .to_infra_err()?;
        }
        let content = serde_json::to_string_pretty(identity)?;
        tokio::fs::write(&self.path, content).await.to_infra_err()
    }
}

#[async_trait]
impl IdentityProvider for FileSessionIdentityProvider {
    async fn current_user(&self) -> Result<Option<Identity>, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Infrastructure(e.to_string())),
        };

        match serde_json::from_str::<Identity>(&content) {
            Ok(identity) => match identity.validate() {
                Ok(()) => Ok(Some(identity)),
                Err(e) => {
                    warn!("[auth] ignoring session {:?}: {}", self.path, e);
                    Ok(None)
                }
            },
            Err(e) => {
                warn!("[auth] ignoring unreadable session {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    async fn sign_in(
        &self,
        method: SignInMethod,
        claim: &Identity,
    ) -> Result<Identity, SignInError> {
        self.check_simulation(method)?;

        claim.validate()?;

        self.persist(claim)
            .await
            .map_err(|e| SignInError::Other(e.message().to_string()))?;

        info!("[auth] signed in uid={} method={:?}", claim.uid, method);
        Ok(claim.clone())
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("[auth] session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Infrastructure(e.to_string())),
        }
    }
}

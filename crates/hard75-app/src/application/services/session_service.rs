use std::sync::Arc;
use tracing::{error, info, warn};

use hard75_domain::identity::{Identity, IdentityProvider, SignInError, SignInMethod};

use crate::application::dtos::NoticeDto;

pub const POPUP_BLOCKED_NOTICE: &str = "Popup blocked. Switching to redirect login…";

/// What an interactive sign-in produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignInReport {
    pub identity: Option<Identity>,
    pub notices: Vec<NoticeDto>,
}

/// Interactive sign-in and sign-out against the identity provider.
///
/// Failures are categorised into notices and never propagate.
pub struct SessionService {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Session left by a previous run, if any
    pub async fn current_user(&self) -> Option<Identity> {
        match self.provider.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("[auth] could not read current session: {}", e);
                None
            }
        }
    }

    /// Popup first; a blocked popup falls back to the redirect flow
    pub async fn sign_in(&self, claim: &Identity) -> SignInReport {
        let mut report = SignInReport::default();

        let result = match self.provider.sign_in(SignInMethod::Popup, claim).await {
            Err(SignInError::PopupBlocked) => {
                info!("[auth] popup blocked, retrying with redirect");
                report.notices.push(NoticeDto::info(POPUP_BLOCKED_NOTICE));
                self.provider.sign_in(SignInMethod::Redirect, claim).await
            }
            other => other,
        };

        match result {
            Ok(identity) => {
                info!("[auth] signed in uid={}", identity.uid);
                report.identity = Some(identity);
            }
            Err(SignInError::PopupClosedByUser) => {
                info!("[auth] popup closed before completing");
                report
                    .notices
                    .push(NoticeDto::error(SignInError::PopupClosedByUser.to_string()));
            }
            Err(e) => {
                error!("[auth] login error: {}", e);
                let text = match e {
                    // Redirect flow itself reported a blocked popup
                    SignInError::PopupBlocked => {
                        SignInError::Other("Popup blocked".to_string()).to_string()
                    }
                    other => other.to_string(),
                };
                report.notices.push(NoticeDto::error(text));
            }
        }

        report
    }

    /// Returns an error notice when the provider refused
    pub async fn sign_out(&self) -> Option<NoticeDto> {
        match self.provider.sign_out().await {
            Ok(()) => {
                info!("[auth] signed out");
                None
            }
            Err(e) => {
                error!("[auth] sign out failed: {}", e);
                Some(NoticeDto::error(format!(
                    "Sign out failed: {}",
                    e.message()
                )))
            }
        }
    }
}

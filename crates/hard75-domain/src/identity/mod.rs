use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::namespace::Namespace;
use crate::shared::{DomainError, UserId};

/// Authenticated user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Bearer token for the remote document store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl Identity {
    pub fn new(uid: &str) -> Self {
        Self {
            uid: UserId::from_string(uid),
            display_name: None,
            email: None,
            id_token: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// Reject ids whose namespace would collide with the guest data
    pub fn validate(&self) -> Result<(), SignInError> {
        if Namespace::is_valid_user_id(self.uid.as_str()) {
            Ok(())
        } else {
            Err(SignInError::Other(format!(
                "user id '{}' is not allowed",
                self.uid
            )))
        }
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::User(self.uid.clone())
    }

    /// Display name, falling back to email, then uid
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(self.uid.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignInMethod {
    Popup,
    Redirect,
}

/// Sign-in failures, by cause
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignInError {
    /// The popup could not open; retry through the redirect flow
    #[error("Popup blocked")]
    PopupBlocked,

    #[error("Login popup was closed before completing.")]
    PopupClosedByUser,

    #[error("Login failed: {0}")]
    Other(String),
}

impl From<SignInError> for DomainError {
    fn from(err: SignInError) -> Self {
        DomainError::Authentication(err.to_string())
    }
}

/// External identity provider.
///
/// `claim` carries whatever the provider's interactive flow collected; a
/// hosted provider may ignore it and use its own UI.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<Option<Identity>, DomainError>;

    async fn sign_in(&self, method: SignInMethod, claim: &Identity)
        -> Result<Identity, SignInError>;

    async fn sign_out(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_fallbacks() {
        let id = Identity::new("uid-9");
        assert_eq!(id.label(), "uid-9");
        let id = id.with_email("a@example.com");
        assert_eq!(id.label(), "a@example.com");
        let id = id.with_display_name("Alice");
        assert_eq!(id.label(), "Alice");
    }

    #[test]
    fn test_identity_namespace() {
        assert_eq!(Identity::new("uid-9").namespace(), Namespace::user("uid-9"));
    }

    #[test]
    fn test_reserved_uid_fails_validation() {
        assert_eq!(Identity::new("uid-9").validate(), Ok(()));
        assert!(matches!(
            Identity::new("guest").validate(),
            Err(SignInError::Other(_))
        ));
        assert!(Identity::new("").validate().is_err());
    }

    #[test]
    fn test_token_not_serialized_when_absent() {
        let json = serde_json::to_value(Identity::new("u")).unwrap();
        assert!(json.get("idToken").is_none());
        assert_eq!(json["uid"], "u");
    }

    #[test]
    fn test_sign_in_error_messages() {
        assert_eq!(
            SignInError::Other("network".into()).to_string(),
            "Login failed: network"
        );
        let err: DomainError = SignInError::PopupClosedByUser.into();
        assert_eq!(err.code().code(), 1001);
    }
}

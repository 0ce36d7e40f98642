mod transition;


use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::UserId;

pub use transition::NamespaceTransition;

/// Prefix shared by every durable key the tracker owns
pub const STORAGE_PREFIX: &str = "hard75";

/// Key remembering the last namespace seen, used to tell a real sign-out
/// from a cold start
pub const LAST_UID_KEY: &str = "hard75:lastUid";

/// Stored form of the guest namespace; no user id may take it
pub const GUEST_ID: &str = "guest";

/// Isolation boundary for stored data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Namespace {
    #[default]
    Guest,
    User(UserId),
}

impl Namespace {
    pub fn user(uid: &str) -> Self {
        Namespace::User(UserId::from_string(uid))
    }

    /// Parse the stored form: `"guest"` or a user id. Blank means guest.
    pub fn parse(stored: &str) -> Self {
        let stored = stored.trim();
        if stored.is_empty() || stored == GUEST_ID {
            Namespace::Guest
        } else {
            Namespace::user(stored)
        }
    }

    /// A user id is usable only if its stored form reads back as the same
    /// user, so it can never share keys with the guest namespace.
    pub fn is_valid_user_id(uid: &str) -> bool {
        Namespace::parse(uid) == Namespace::user(uid)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Namespace::Guest => GUEST_ID,
            Namespace::User(uid) => uid.as_str(),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Namespace::Guest)
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Namespace::Guest => None,
            Namespace::User(uid) => Some(uid),
        }
    }

    /// `hard75:<namespace>:days`
    pub fn days_key(&self) -> String {
        format!("{}:{}:days", STORAGE_PREFIX, self.as_str())
    }

    /// `hard75:<namespace>:longest`
    pub fn longest_key(&self) -> String {
        format!("{}:{}:longest", STORAGE_PREFIX, self.as_str())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Namespace::parse(&value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.as_str().to_string()
    }
}

impl From<UserId> for Namespace {
    fn from(uid: UserId) -> Self {
        Namespace::User(uid)
    }
}

use serde::{Deserialize, Serialize};

use super::Namespace;

/// How the active namespace moved in response to an auth signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceTransition {
    /// First signal of the visit and nobody is signed in
    ColdStartGuest,
    /// First signal of the visit re-attaches the user seen last time
    SessionRestored,
    SignedIn,
    SwitchedUser { from: Namespace },
    /// A user active during this visit signed out
    SignedOut { from: Namespace },
    Unchanged,
}

impl NamespaceTransition {
    /// `active` is `None` until the first auth signal of the visit arrives.
    pub fn classify(
        active: Option<&Namespace>,
        last_seen: Option<&Namespace>,
        next: &Namespace,
    ) -> Self {
        match active {
            None => match next {
                Namespace::Guest => NamespaceTransition::ColdStartGuest,
                Namespace::User(_) if last_seen == Some(next) => {
                    NamespaceTransition::SessionRestored
                }
                Namespace::User(_) => NamespaceTransition::SignedIn,
            },
            Some(current) if current == next => NamespaceTransition::Unchanged,
            Some(current) => match (current, next) {
                (Namespace::User(_), Namespace::Guest) => NamespaceTransition::SignedOut {
                    from: current.clone(),
                },
                (Namespace::User(_), Namespace::User(_)) => NamespaceTransition::SwitchedUser {
                    from: current.clone(),
                },
                _ => NamespaceTransition::SignedIn,
            },
        }
    }

    /// Whether the view must be wiped and a sign-out notice shown
    pub fn is_real_sign_out(&self) -> bool {
        matches!(self, NamespaceTransition::SignedOut { .. })
    }

    /// Whether the user should see a sign-in confirmation
    pub fn announces_sign_in(&self) -> bool {
        matches!(
            self,
            NamespaceTransition::SignedIn | NamespaceTransition::SwitchedUser { .. }
        )
    }

    /// Whether the live remote subscription has to be replaced or dropped
    pub fn changes_namespace(&self) -> bool {
        !matches!(self, NamespaceTransition::Unchanged)
    }
}

//! Identity, token and session types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Signed-in user as reported by the identity provider.
///
/// Owned by the provider; the session store only keeps a shared read-only copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-unique subject identifier.
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name, then email, then uid.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Short-lived bearer credential.
///
/// Never empty. `Debug` output is redacted so tokens don't end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Result<Self, AuthError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthError::token_refresh("provider returned an empty token"));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&"<redacted>").finish()
    }
}

/// Provider notification: the current identity changed (or was first reported).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityChanged(pub Option<Identity>);

impl IdentityChanged {
    pub fn signed_in(identity: Identity) -> Self {
        Self(Some(identity))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

/// Snapshot of the client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<Arc<Identity>>,
    /// True until the provider has reported its first state.
    pub loading: bool,
}

impl Session {
    /// Initial state: nothing known yet, so still loading.
    pub(crate) fn uninitialized() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Lifecycle of a [`crate::SessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Loading => write!(f, "loading"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Anonymous => write!(f, "anonymous"),
        }
    }
}

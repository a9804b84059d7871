//! Authentication error types.
//!
//! Every identity and session failure surfaces as an [`AuthError`]: sign-in,
//! sign-out, token refresh, and unauthorized responses from the backend.

use std::fmt;

/// Errors that can occur while managing the client session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected the sign-in attempt.
    #[error("Sign-in failed: {message}")]
    SignIn {
        /// Description of why sign-in failed.
        message: String,
    },

    /// The provider could not sign the user out.
    #[error("Sign-out failed: {message}")]
    SignOut {
        /// Description of why sign-out failed.
        message: String,
    },

    /// A fresh identity token could not be obtained.
    #[error("Token refresh failed: {message}")]
    TokenRefresh {
        /// Description of why the refresh failed.
        message: String,
    },

    /// The backend answered 401 for an outbound request.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of the rejected request.
        message: String,
    },

    /// An operation needed a signed-in identity but there is none.
    #[error("Not signed in")]
    NotSignedIn,

    /// The identity provider returned an error.
    #[error("Identity provider error: {provider} - {message}")]
    IdentityProvider {
        /// The identity provider name.
        provider: String,
        /// Description of the error.
        message: String,
    },

    /// The session store was used out of order (e.g. initialized twice).
    #[error("Session lifecycle error: {message}")]
    Lifecycle {
        /// Description of the misuse.
        message: String,
    },

    /// Persisted session data could not be read or written.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `SignIn` error.
    #[must_use]
    pub fn sign_in(message: impl Into<String>) -> Self {
        Self::SignIn {
            message: message.into(),
        }
    }

    /// Creates a new `SignOut` error.
    #[must_use]
    pub fn sign_out(message: impl Into<String>) -> Self {
        Self::SignOut {
            message: message.into(),
        }
    }

    /// Creates a new `TokenRefresh` error.
    #[must_use]
    pub fn token_refresh(message: impl Into<String>) -> Self {
        Self::TokenRefresh {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `IdentityProvider` error.
    #[must_use]
    pub fn identity_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IdentityProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Lifecycle` error.
    #[must_use]
    pub fn lifecycle(message: impl Into<String>) -> Self {
        Self::Lifecycle {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns `true` if signing in again is the way out of this error.
    #[must_use]
    pub fn requires_sign_in(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::NotSignedIn | Self::TokenRefresh { .. }
        )
    }

    /// Returns the error category for logging.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SignIn { .. } | Self::SignOut { .. } | Self::NotSignedIn => {
                ErrorCategory::Session
            }
            Self::TokenRefresh { .. } | Self::Unauthorized { .. } => ErrorCategory::Token,
            Self::IdentityProvider { .. } => ErrorCategory::Provider,
            Self::Lifecycle { .. } | Self::Storage { .. } => ErrorCategory::Internal,
        }
    }
}

/// Coarse grouping of [`AuthError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Session,
    Token,
    Provider,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::Token => write!(f, "token"),
            Self::Provider => write!(f, "provider"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

//! # chorrus-auth
//!
//! Client-side authentication state for Chorrus.
//!
//! ## Modules
//!
//! - [`provider`] - The [`TokenProvider`] trait and the [`IdentityFeed`] fan-out
//! - [`session`] - [`SessionStore`], the observable session mirrored from the provider
//! - [`memory`] - In-process provider for static tokens and tests
//! - [`firebase`] - Firebase Authentication REST provider
//! - [`types`] - Identity, token and session types
//! - [`error`] - [`AuthError`]
//!
//! ## Flow
//!
//! The provider owns the signed-in identity and pushes
//! [`IdentityChanged`] messages to each subscriber. The [`SessionStore`] is
//! the single consumer on the client side; everything else reads the store.

pub mod error;
pub mod firebase;
pub mod memory;
pub mod provider;
pub mod session;
pub mod types;

pub use error::{AuthError, ErrorCategory};
pub use firebase::{FirebaseConfig, FirebaseTokenProvider};
pub use memory::MemoryTokenProvider;
pub use provider::{IdentityFeed, IdentityReceiver, TokenProvider};
pub use session::SessionStore;
pub use types::{AuthToken, Identity, IdentityChanged, Session, SessionState};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;

//! HTTP client for the Chorrus backend.
//!
//! [`ApiClient`] wraps a [`chorrus_auth::SessionStore`]: each call gets a fresh
//! bearer token from the session's provider, and a 401 from the backend is
//! reported once to the configured [`InvalidationHook`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use chorrus_auth::{Identity, MemoryTokenProvider, SessionStore};
//! use chorrus_client::{ApiClient, ClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(MemoryTokenProvider::signed_in(Identity::new("uid-1"), "token"));
//! let session = SessionStore::new_shared(provider);
//! session.initialize()?;
//! session.ready().await?;
//!
//! let client = ApiClient::new(&ClientConfig::default(), session)?;
//! let chores = client.chores().list(false).await?;
//! # Ok(())
//! # }
//! ```

pub mod chores;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod households;
pub mod invalidation;
pub mod pipeline;

pub use chores::ChoreService;
pub use config::{API_URL_ENV, ClientConfig, DEFAULT_API_URL, FirebaseSettings, LoggingConfig};
pub use dashboard::Dashboard;
pub use error::{ClientError, ClientResult, RequestError};
pub use households::HouseholdService;
pub use invalidation::{InvalidationBroadcaster, InvalidationHook, SessionInvalidated};
pub use pipeline::{ApiClient, RequestContext};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use chorrus_auth::{
    FirebaseConfig, FirebaseTokenProvider, Identity, MemoryTokenProvider, SessionStore,
    TokenProvider,
};
use chorrus_client::{ApiClient, ClientConfig, InvalidationHook, SessionInvalidated};
use colored::Colorize;

use crate::config::data_dir;

/// Uid reported for sessions built from `--token`.
const TOKEN_IDENTITY: &str = "token";

/// Where the Firebase session of `profile` is persisted.
pub fn session_path(profile: &str) -> Result<PathBuf> {
    Ok(data_dir()?.join(format!("session.{profile}.json")))
}

pub fn firebase_config(config: &ClientConfig, profile: &str) -> Result<Option<FirebaseConfig>> {
    let Some(api_key) = &config.firebase.api_key else {
        return Ok(None);
    };
    let mut fb = FirebaseConfig::new(api_key.clone()).with_persist_path(session_path(profile)?);
    if let (Some(idtk), Some(secure)) = (
        &config.firebase.identity_toolkit_url,
        &config.firebase.secure_token_url,
    ) {
        fb = fb.with_endpoints(idtk.clone(), secure.clone());
    }
    if let Some(timeout) = config.request_timeout() {
        fb = fb.with_request_timeout(timeout);
    }
    Ok(Some(fb))
}

/// Picks the identity provider for this invocation: `--token` first, then
/// the persisted Firebase session, otherwise nobody.
pub fn select_provider(
    config: &ClientConfig,
    profile: &str,
    token: Option<&str>,
) -> Result<Arc<dyn TokenProvider>> {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        tracing::debug!("using token from --token");
        return Ok(Arc::new(MemoryTokenProvider::signed_in(
            Identity::new(TOKEN_IDENTITY),
            token.trim(),
        )));
    }
    match firebase_config(config, profile)? {
        Some(fb) => Ok(Arc::new(
            FirebaseTokenProvider::restore(fb).context("Failed to restore stored session")?,
        )),
        None => Ok(Arc::new(MemoryTokenProvider::anonymous())),
    }
}

/// Starts a session store on `provider` and waits for its first state.
pub async fn start_session(provider: Arc<dyn TokenProvider>) -> Result<Arc<SessionStore>> {
    let session = SessionStore::new_shared(provider);
    session.initialize()?;
    session.ready().await?;
    Ok(session)
}

/// Backend client for commands that need a signed-in user.
pub async fn authenticated_client(
    config: &ClientConfig,
    profile: &str,
    token: Option<&str>,
) -> Result<ApiClient> {
    let session = start_session(select_provider(config, profile, token)?).await?;
    session
        .require_identity()
        .context("Not signed in. Run: chorrus login --email <email>")?;
    Ok(ApiClient::new(config, session)?.with_invalidation_hook(Arc::new(SignInHint::default())))
}

/// Prints a sign-in hint the first time the backend rejects the session.
#[derive(Debug, Default)]
pub struct SignInHint {
    shown: AtomicBool,
}

impl InvalidationHook for SignInHint {
    fn session_invalidated(&self, event: &SessionInvalidated) {
        tracing::debug!(method = %event.method, path = %event.path, "session invalidated");
        if !self.shown.swap(true, Ordering::SeqCst) {
            eprintln!(
                "{} Your session is no longer valid. Run: {}",
                "!".yellow(),
                "chorrus login".cyan()
            );
        }
    }
}

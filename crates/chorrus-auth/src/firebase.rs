//! Firebase Authentication over its REST API.
//!
//! Email/password sign-in goes through the Identity Toolkit
//! `accounts:signInWithPassword` endpoint; ID tokens are refreshed through the
//! Secure Token `token` endpoint once they are within [`EXPIRY_SKEW_SECS`] of
//! expiring. The refresh token can be persisted to disk so a later process can
//! restore the session without signing in again.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::error::AuthError;
use crate::provider::{IdentityFeed, IdentityReceiver, TokenProvider};
use crate::types::{AuthToken, Identity};

const PROVIDER_NAME: &str = "firebase";

/// Refresh tokens that expire within this many seconds.
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// Configuration for [`FirebaseTokenProvider`].
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    pub api_key: String,

    /// Identity Toolkit base URL (default: `https://identitytoolkit.googleapis.com/v1`).
    pub identity_toolkit_url: String,

    /// Secure Token base URL (default: `https://securetoken.googleapis.com/v1`).
    pub secure_token_url: String,

    /// Where to persist the session, if anywhere.
    pub persist_path: Option<PathBuf>,

    /// HTTP request timeout (default: 10 seconds).
    pub request_timeout: Duration,
}

impl FirebaseConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            identity_toolkit_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            secure_token_url: "https://securetoken.googleapis.com/v1".to_string(),
            persist_path: None,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Points both endpoints at another host (emulator or test server).
    #[must_use]
    pub fn with_endpoints(
        mut self,
        identity_toolkit_url: impl Into<String>,
        secure_token_url: impl Into<String>,
    ) -> Self {
        self.identity_toolkit_url = identity_toolkit_url.into();
        self.secure_token_url = secure_token_url.into();
        self
    }

    /// Persists the session to `path` on sign-in and refresh.
    #[must_use]
    pub fn with_persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Session material kept in memory and, optionally, on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    identity: Identity,
    id_token: String,
    refresh_token: String,
    /// Unix timestamp (seconds) at which `id_token` expires.
    expires_at: i64,
}

impl StoredSession {
    fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - now > EXPIRY_SKEW_SECS
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Firebase-backed [`TokenProvider`].
pub struct FirebaseTokenProvider {
    http: reqwest::Client,
    config: FirebaseConfig,
    feed: IdentityFeed,
    session: Mutex<Option<StoredSession>>,
}

impl FirebaseTokenProvider {
    /// Creates a provider with nobody signed in.
    pub fn new(config: FirebaseConfig) -> Result<Self, AuthError> {
        Self::with_session(config, None)
    }

    /// Creates a provider, restoring the persisted session if there is one.
    pub fn restore(config: FirebaseConfig) -> Result<Self, AuthError> {
        let stored = match &config.persist_path {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(path)
                    .map_err(|e| AuthError::storage(format!("{}: {e}", path.display())))?;
                let stored: StoredSession = serde_json::from_str(&content)
                    .map_err(|e| AuthError::storage(format!("{}: {e}", path.display())))?;
                tracing::debug!(uid = %stored.identity.uid, "restored firebase session");
                Some(stored)
            }
            _ => None,
        };
        Self::with_session(config, stored)
    }

    fn with_session(
        config: FirebaseConfig,
        stored: Option<StoredSession>,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::identity_provider(PROVIDER_NAME, e.to_string()))?;
        let feed = IdentityFeed::new(stored.as_ref().map(|s| s.identity.clone()));
        Ok(Self {
            http,
            config,
            feed,
            session: Mutex::new(stored),
        })
    }

    /// Signs in with email and password and notifies subscribers.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let url = format!(
            "{}/accounts:signInWithPassword",
            self.config.identity_toolkit_url.trim_end_matches('/')
        );
        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| AuthError::identity_provider(PROVIDER_NAME, e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::sign_in(error_message(resp).await));
        }

        let body: SignInResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::identity_provider(PROVIDER_NAME, e.to_string()))?;

        let identity = Identity {
            uid: body.local_id,
            email: body.email.filter(|e| !e.is_empty()),
            display_name: body.display_name.filter(|n| !n.is_empty()),
        };
        let stored = StoredSession {
            identity: identity.clone(),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: expires_at(&body.expires_in)?,
        };

        let mut session = self.session.lock().await;
        self.persist(&stored)?;
        *session = Some(stored);
        drop(session);

        tracing::info!(uid = %identity.uid, "signed in with firebase");
        self.feed.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn refresh(&self, stored: &StoredSession) -> Result<StoredSession, AuthError> {
        let url = format!("{}/token", self.config.secure_token_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", stored.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::token_refresh(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::token_refresh(error_message(resp).await));
        }

        let body: RefreshResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::token_refresh(e.to_string()))?;

        Ok(StoredSession {
            identity: stored.identity.clone(),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: expires_at(&body.expires_in)?,
        })
    }

    fn persist(&self, stored: &StoredSession) -> Result<(), AuthError> {
        let Some(path) = &self.config.persist_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AuthError::storage(format!("{}: {e}", parent.display())))?;
        }
        let content =
            serde_json::to_string_pretty(stored).map_err(|e| AuthError::storage(e.to_string()))?;
        fs::write(path, content).map_err(|e| AuthError::storage(format!("{}: {e}", path.display())))
    }

    fn remove_persisted(&self) -> Result<(), AuthError> {
        match &self.config.persist_path {
            Some(path) if path.exists() => fs::remove_file(path)
                .map_err(|e| AuthError::sign_out(format!("{}: {e}", path.display()))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TokenProvider for FirebaseTokenProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn subscribe(&self) -> IdentityReceiver {
        self.feed.subscribe()
    }

    fn current_identity(&self) -> Option<Identity> {
        self.feed.current()
    }

    async fn id_token(&self) -> Result<AuthToken, AuthError> {
        let mut session = self.session.lock().await;
        let stored = session.as_ref().ok_or(AuthError::NotSignedIn)?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        if stored.is_fresh(now) {
            return AuthToken::new(stored.id_token.clone());
        }

        tracing::debug!(uid = %stored.identity.uid, "refreshing firebase id token");
        let refreshed = self.refresh(stored).await?;
        if let Err(e) = self.persist(&refreshed) {
            tracing::warn!(error = %e, "failed to persist refreshed session");
        }
        let token = AuthToken::new(refreshed.id_token.clone())?;
        *session = Some(refreshed);
        Ok(token)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut session = self.session.lock().await;
        self.remove_persisted()?;
        *session = None;
        drop(session);
        self.feed.publish(None);
        Ok(())
    }
}

impl std::fmt::Debug for FirebaseTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseTokenProvider")
            .field("identity_toolkit_url", &self.config.identity_toolkit_url)
            .field("persist_path", &self.config.persist_path)
            .finish()
    }
}

fn expires_at(expires_in: &str) -> Result<i64, AuthError> {
    let seconds: i64 = expires_in.trim().parse().map_err(|_| {
        AuthError::identity_provider(PROVIDER_NAME, format!("invalid expiresIn '{expires_in}'"))
    })?;
    Ok(OffsetDateTime::now_utc().unix_timestamp() + seconds)
}

async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("HTTP {status}: {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> FirebaseConfig {
        FirebaseConfig::new("test-key")
            .with_endpoints(format!("{}/v1", server.uri()), format!("{}/v1", server.uri()))
    }

    async fn mount_sign_in(server: &MockServer, expires_in: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "email": "sam@example.com",
                "returnSecureToken": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "uid-sam",
                "email": "sam@example.com",
                "displayName": "",
                "idToken": "id-1",
                "refreshToken": "refresh-1",
                "expiresIn": expires_in,
                "registered": true
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_sign_in_publishes_identity() {
        let server = MockServer::start().await;
        mount_sign_in(&server, "3600").await;

        let provider = FirebaseTokenProvider::new(config_for(&server)).unwrap();
        let mut rx = provider.subscribe();
        assert_eq!(rx.recv().await.unwrap().0, None);

        let identity = provider
            .sign_in_with_password("sam@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(identity.uid, "uid-sam");
        assert!(identity.display_name.is_none());
        assert_eq!(rx.recv().await.unwrap().0, Some(identity));
        assert_eq!(provider.id_token().await.unwrap().as_str(), "id-1");
    }

    #[tokio::test]
    async fn test_sign_in_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "INVALID_PASSWORD" }
            })))
            .mount(&server)
            .await;

        let provider = FirebaseTokenProvider::new(config_for(&server)).unwrap();
        let err = provider
            .sign_in_with_password("sam@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Sign-in failed: INVALID_PASSWORD");
        assert!(provider.current_identity().is_none());
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let server = MockServer::start().await;
        mount_sign_in(&server, "0").await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id_token": "id-2",
                "refresh_token": "refresh-2",
                "expires_in": "3600",
                "token_type": "Bearer",
                "user_id": "uid-sam"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = FirebaseTokenProvider::new(config_for(&server)).unwrap();
        provider
            .sign_in_with_password("sam@example.com", "hunter2")
            .await
            .unwrap();

        assert_eq!(provider.id_token().await.unwrap().as_str(), "id-2");
        // Fresh now, no second refresh.
        assert_eq!(provider.id_token().await.unwrap().as_str(), "id-2");
    }

    #[tokio::test]
    async fn test_refresh_failure_is_token_error() {
        let server = MockServer::start().await;
        mount_sign_in(&server, "0").await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "TOKEN_EXPIRED" }
            })))
            .mount(&server)
            .await;

        let provider = FirebaseTokenProvider::new(config_for(&server)).unwrap();
        provider
            .sign_in_with_password("sam@example.com", "hunter2")
            .await
            .unwrap();
        let err = provider.id_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRefresh { ref message } if message == "TOKEN_EXPIRED"));
    }

    #[tokio::test]
    async fn test_persisted_session_round_trip() {
        let server = MockServer::start().await;
        mount_sign_in(&server, "3600").await;
        let dir = tempfile::tempdir().unwrap();
        let session_path = dir.path().join("session.json");

        let provider =
            FirebaseTokenProvider::new(config_for(&server).with_persist_path(&session_path))
                .unwrap();
        provider
            .sign_in_with_password("sam@example.com", "hunter2")
            .await
            .unwrap();
        assert!(session_path.exists());

        let restored =
            FirebaseTokenProvider::restore(config_for(&server).with_persist_path(&session_path))
                .unwrap();
        assert_eq!(restored.current_identity().unwrap().uid, "uid-sam");
        assert_eq!(restored.id_token().await.unwrap().as_str(), "id-1");

        restored.sign_out().await.unwrap();
        assert!(!session_path.exists());
        assert!(restored.current_identity().is_none());
        assert!(matches!(restored.id_token().await, Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn test_restore_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let session_path = dir.path().join("session.json");
        fs::write(&session_path, "not json").unwrap();
        let err = FirebaseTokenProvider::restore(
            FirebaseConfig::new("k").with_persist_path(&session_path),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));
    }
}

//! In-process identity provider.
//!
//! Holds the identity and token in memory. Used for pre-issued tokens
//! (`--token` on the CLI) and as the provider in tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::AuthError;
use crate::provider::{IdentityFeed, IdentityReceiver, TokenProvider};
use crate::types::{AuthToken, Identity};

#[derive(Debug, Clone)]
enum TokenSource {
    /// The same token every time.
    Static(String),
    /// A new `{prefix}-{n}` token per call.
    Minted { prefix: String },
}

#[derive(Debug)]
pub struct MemoryTokenProvider {
    feed: IdentityFeed,
    source: Mutex<TokenSource>,
    issued: AtomicU64,
}

impl MemoryTokenProvider {
    /// Provider with nobody signed in.
    pub fn anonymous() -> Self {
        Self {
            feed: IdentityFeed::default(),
            source: Mutex::new(TokenSource::Minted {
                prefix: "token".to_string(),
            }),
            issued: AtomicU64::new(0),
        }
    }

    /// Provider already signed in with a fixed token.
    pub fn signed_in(identity: Identity, token: impl Into<String>) -> Self {
        Self {
            feed: IdentityFeed::new(Some(identity)),
            source: Mutex::new(TokenSource::Static(token.into())),
            issued: AtomicU64::new(0),
        }
    }

    /// Provider already signed in that mints a distinct token per request.
    pub fn minting(identity: Identity, prefix: impl Into<String>) -> Self {
        Self {
            feed: IdentityFeed::new(Some(identity)),
            source: Mutex::new(TokenSource::Minted {
                prefix: prefix.into(),
            }),
            issued: AtomicU64::new(0),
        }
    }

    /// Signs `identity` in with a fixed token and notifies subscribers.
    pub fn sign_in(&self, identity: Identity, token: impl Into<String>) {
        *self.source.lock() = TokenSource::Static(token.into());
        tracing::debug!(uid = %identity.uid, "memory provider signed in");
        self.feed.publish(Some(identity));
    }

    /// Number of tokens handed out so far.
    pub fn issued_tokens(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Default for MemoryTokenProvider {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[async_trait]
impl TokenProvider for MemoryTokenProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn subscribe(&self) -> IdentityReceiver {
        self.feed.subscribe()
    }

    fn current_identity(&self) -> Option<Identity> {
        self.feed.current()
    }

    async fn id_token(&self) -> Result<AuthToken, AuthError> {
        if self.feed.current().is_none() {
            return Err(AuthError::NotSignedIn);
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = match &*self.source.lock() {
            TokenSource::Static(token) => token.clone(),
            TokenSource::Minted { prefix } => format!("{prefix}-{n}"),
        };
        AuthToken::new(token)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.feed.publish(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_has_no_token() {
        let provider = MemoryTokenProvider::anonymous();
        assert!(matches!(provider.id_token().await, Err(AuthError::NotSignedIn)));
        assert_eq!(provider.issued_tokens(), 0);
    }

    #[tokio::test]
    async fn test_minting_issues_distinct_tokens() {
        let provider = MemoryTokenProvider::minting(Identity::new("u1"), "tok");
        let first = provider.id_token().await.unwrap();
        let second = provider.id_token().await.unwrap();
        assert_eq!(first.as_str(), "tok-1");
        assert_eq!(second.as_str(), "tok-2");
        assert_eq!(provider.issued_tokens(), 2);
    }

    #[tokio::test]
    async fn test_sign_in_and_out_notify_subscribers() {
        let provider = MemoryTokenProvider::anonymous();
        let mut rx = provider.subscribe();
        assert_eq!(rx.recv().await.unwrap().0, None);

        provider.sign_in(Identity::new("u1"), "static");
        assert_eq!(rx.recv().await.unwrap().0, Some(Identity::new("u1")));
        assert_eq!(provider.id_token().await.unwrap().as_str(), "static");

        provider.sign_out().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().0, None);
        assert!(provider.current_identity().is_none());
    }
}

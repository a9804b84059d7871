//! Identity provider abstraction.
//!
//! A [`TokenProvider`] owns the signed-in identity. Consumers learn about
//! identity changes by subscribing: each subscriber gets its own FIFO channel
//! whose first message is the provider's state at subscription time, followed
//! by every subsequent change in the order it happened.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::AuthError;
use crate::types::{AuthToken, Identity, IdentityChanged};

/// Receiving half of a provider subscription.
pub type IdentityReceiver = mpsc::UnboundedReceiver<IdentityChanged>;

/// Third-party identity service seen from the client.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Subscribes to identity changes. The current state is delivered first.
    fn subscribe(&self) -> IdentityReceiver;

    /// The identity the provider currently considers signed in.
    fn current_identity(&self) -> Option<Identity>;

    /// Returns a valid identity token for the signed-in user, refreshing it
    /// with the provider if needed.
    async fn id_token(&self) -> Result<AuthToken, AuthError>;

    /// Ends the provider session. Subscribers receive `IdentityChanged(None)`
    /// on success.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Fan-out of identity changes to any number of subscribers.
///
/// Building block for [`TokenProvider`] implementations. Publishing and
/// subscribing share one lock, so every subscriber sees the same ordered
/// sequence and no subscriber misses a change made after it subscribed.
#[derive(Debug, Default)]
pub struct IdentityFeed {
    inner: Mutex<FeedState>,
}

#[derive(Debug, Default)]
struct FeedState {
    current: Option<Identity>,
    subscribers: Vec<mpsc::UnboundedSender<IdentityChanged>>,
}

impl IdentityFeed {
    pub fn new(initial: Option<Identity>) -> Self {
        Self {
            inner: Mutex::new(FeedState {
                current: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn subscribe(&self) -> IdentityReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.inner.lock();
        // The receiver is alive, so this send cannot fail.
        let _ = tx.send(IdentityChanged(state.current.clone()));
        state.subscribers.push(tx);
        rx
    }

    /// Records the new identity and notifies subscribers. Closed subscribers
    /// are dropped.
    pub fn publish(&self, identity: Option<Identity>) {
        let mut state = self.inner.lock();
        state.current = identity.clone();
        state
            .subscribers
            .retain(|tx| tx.send(IdentityChanged(identity.clone())).is_ok());
    }

    pub fn current(&self) -> Option<Identity> {
        self.inner.lock().current.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

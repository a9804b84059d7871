//! Client session state.
//!
//! [`SessionStore`] mirrors the provider's signed-in identity into an
//! observable [`Session`]. It is the sole consumer of the provider's
//! `IdentityChanged` channel and applies notifications strictly in delivery
//! order from a single task.
//!
//! ```text
//! Uninitialized ──initialize──▶ Loading ──first notification──▶ Authenticated ⇄ Anonymous
//! ```
//!
//! Once the first notification is applied the store never returns to
//! `Loading`. Logout clears the local identity only after the provider has
//! confirmed the sign-out.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

use crate::error::AuthError;
use crate::provider::{IdentityReceiver, TokenProvider};
use crate::types::{Identity, IdentityChanged, Session, SessionState};

enum Lifecycle {
    Uninitialized,
    Running(JoinHandle<()>),
    Stopped { initialized: bool },
}

/// Observable, explicitly owned session state.
///
/// Create one per application, call [`SessionStore::initialize`] once from
/// within a Tokio runtime, share it by `Arc`, and call
/// [`SessionStore::teardown`] (or drop it) on shutdown.
pub struct SessionStore {
    provider: Arc<dyn TokenProvider>,
    state: Arc<watch::Sender<Session>>,
    lifecycle: Mutex<Lifecycle>,
    shutdown: Notify,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        let (state, _) = watch::channel(Session::uninitialized());
        Self {
            provider,
            state: Arc::new(state),
            lifecycle: Mutex::new(Lifecycle::Uninitialized),
            shutdown: Notify::new(),
        }
    }

    pub fn new_shared(provider: Arc<dyn TokenProvider>) -> Arc<Self> {
        Arc::new(Self::new(provider))
    }

    pub fn provider(&self) -> &Arc<dyn TokenProvider> {
        &self.provider
    }

    /// Subscribes to the provider and starts applying its notifications.
    ///
    /// Fails if the store was already initialized or torn down.
    pub fn initialize(&self) -> Result<(), AuthError> {
        let mut lifecycle = self.lifecycle.lock();
        match &*lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Running(_) => {
                return Err(AuthError::lifecycle("session store already initialized"));
            }
            Lifecycle::Stopped { .. } => {
                return Err(AuthError::lifecycle("session store was torn down"));
            }
        }

        let receiver = self.provider.subscribe();
        let handle = tokio::spawn(apply_notifications(
            receiver,
            Arc::clone(&self.state),
            self.provider.name().to_string(),
        ));
        *lifecycle = Lifecycle::Running(handle);
        tracing::debug!(provider = self.provider.name(), "session store initialized");
        Ok(())
    }

    /// Signs out with the provider, then clears the local identity.
    ///
    /// On failure the local session is left exactly as it was.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(provider = self.provider.name(), error = %e, "sign-out failed");
            return Err(e);
        }
        self.state.send_modify(|session| session.identity = None);
        tracing::info!(provider = self.provider.name(), "signed out");
        Ok(())
    }

    /// Cancels the provider subscription. Safe to call any number of times,
    /// including before [`SessionStore::initialize`].
    pub fn teardown(&self) {
        let mut lifecycle = self.lifecycle.lock();
        let initialized = match std::mem::replace(
            &mut *lifecycle,
            Lifecycle::Stopped { initialized: false },
        ) {
            Lifecycle::Uninitialized => false,
            Lifecycle::Running(handle) => {
                handle.abort();
                tracing::debug!("session store torn down");
                true
            }
            Lifecycle::Stopped { initialized } => initialized,
        };
        *lifecycle = Lifecycle::Stopped { initialized };
        drop(lifecycle);
        self.shutdown.notify_waiters();
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.state.borrow().identity.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn state(&self) -> SessionState {
        if matches!(
            *self.lifecycle.lock(),
            Lifecycle::Uninitialized | Lifecycle::Stopped { initialized: false }
        ) {
            return SessionState::Uninitialized;
        }
        let session = self.state.borrow();
        if session.loading {
            SessionState::Loading
        } else if session.identity.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Observes every session change. Receivers always see the latest value
    /// and never an older one after a newer one.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Waits until the provider has reported its first state.
    pub async fn ready(&self) -> Result<Session, AuthError> {
        let shutdown = self.shutdown.notified();
        tokio::pin!(shutdown);
        shutdown.as_mut().enable();

        let (uninitialized, stopped) = {
            let lifecycle = self.lifecycle.lock();
            (
                matches!(*lifecycle, Lifecycle::Uninitialized),
                matches!(*lifecycle, Lifecycle::Stopped { .. }),
            )
        };
        if uninitialized {
            return Err(AuthError::lifecycle("session store not initialized"));
        }
        if stopped && self.is_loading() {
            return Err(AuthError::lifecycle(
                "session store torn down before the provider reported",
            ));
        }

        let mut receiver = self.state.subscribe();
        tokio::select! {
            session = receiver.wait_for(|s| !s.loading) => session
                .map(|s| s.clone())
                .map_err(|_| AuthError::lifecycle("session channel closed")),
            _ = &mut shutdown => Err(AuthError::lifecycle(
                "session store torn down before the provider reported",
            )),
        }
    }

    /// The auth gate: the signed-in identity, or `NotSignedIn`.
    pub fn require_identity(&self) -> Result<Arc<Identity>, AuthError> {
        self.identity().ok_or(AuthError::NotSignedIn)
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("provider", &self.provider.name())
            .field("state", &self.state())
            .finish()
    }
}

async fn apply_notifications(
    mut receiver: IdentityReceiver,
    state: Arc<watch::Sender<Session>>,
    provider: String,
) {
    while let Some(IdentityChanged(identity)) = receiver.recv().await {
        match &identity {
            Some(identity) => tracing::info!(%provider, uid = %identity.uid, "identity changed"),
            None => tracing::info!(%provider, "identity cleared"),
        }
        state.send_replace(Session {
            identity: identity.map(Arc::new),
            loading: false,
        });
    }
    tracing::debug!(%provider, "identity channel closed");
}

//! Session invalidation.
//!
//! When the backend answers 401 the pipeline emits one [`SessionInvalidated`]
//! event per response to the configured [`InvalidationHook`]. Several requests
//! can fail at once, so hooks must tolerate repeated events.

use std::sync::Arc;

use reqwest::Method;
use tokio::sync::broadcast;

const DEFAULT_BUFFER_SIZE: usize = 64;

/// A request was rejected because the session is no longer valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInvalidated {
    pub method: Method,
    pub path: String,
}

/// Receives [`SessionInvalidated`] events, typically to send the user back to
/// sign-in.
pub trait InvalidationHook: Send + Sync {
    fn session_invalidated(&self, event: &SessionInvalidated);
}

impl<F> InvalidationHook for F
where
    F: Fn(&SessionInvalidated) + Send + Sync,
{
    fn session_invalidated(&self, event: &SessionInvalidated) {
        self(event)
    }
}

/// Hook that republishes events on a broadcast channel.
#[derive(Clone)]
pub struct InvalidationBroadcaster {
    sender: broadcast::Sender<SessionInvalidated>,
}

impl InvalidationBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Events emitted before subscribing are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionInvalidated> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InvalidationBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationHook for InvalidationBroadcaster {
    fn session_invalidated(&self, event: &SessionInvalidated) {
        // No subscribers is fine.
        let _ = self.sender.send(event.clone());
    }
}

impl std::fmt::Debug for InvalidationBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event() -> SessionInvalidated {
        SessionInvalidated {
            method: Method::GET,
            path: "/chores/".to_string(),
        }
    }

    #[test]
    fn test_broadcaster_without_subscribers() {
        let broadcaster = InvalidationBroadcaster::new();
        broadcaster.session_invalidated(&event());
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcaster_delivers_to_all_subscribers() {
        let broadcaster = InvalidationBroadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.session_invalidated(&event());

        assert_eq!(first.recv().await.unwrap(), event());
        assert_eq!(second.recv().await.unwrap(), event());
    }

    #[test]
    fn test_closure_hook() {
        let calls = AtomicUsize::new(0);
        let hook = |_: &SessionInvalidated| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        hook.session_invalidated(&event());
        hook.session_invalidated(&event());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

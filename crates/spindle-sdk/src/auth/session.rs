//! Observable session state
//!
//! The client publishes sign-in and sign-out transitions on a watch
//! channel; UI layers subscribe instead of polling token storage.

use std::sync::Arc;

use tokio::sync::watch;

/// Whether the client currently holds a usable session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    Authenticated,
}

/// Publisher side of the session channel, owned by the client
#[derive(Clone)]
pub(crate) struct SessionHandle {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    pub(crate) fn new(initial: SessionState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn publish(&self, state: SessionState) {
        let _ = self.tx.send_replace(state);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub(crate) fn current(&self) -> SessionState {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let handle = SessionHandle::new(SessionState::SignedOut);
        let mut rx = handle.subscribe();
        assert_eq!(*rx.borrow(), SessionState::SignedOut);

        handle.publish(SessionState::Authenticated);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SessionState::Authenticated);
        assert_eq!(handle.current(), SessionState::Authenticated);
    }
}

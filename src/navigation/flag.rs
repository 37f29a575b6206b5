use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::firebase::AuthUser;

/// A change reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { uid: String },
    SignedOut,
}

impl AuthEvent {
    pub fn from_user(user: Option<&AuthUser>) -> Self {
        match user {
            Some(user) => AuthEvent::SignedIn {
                uid: user.uid.clone(),
            },
            None => AuthEvent::SignedOut,
        }
    }
}

/// Shared "is authenticated" cell read by the navigation guard.
///
/// Starts out `false`. Written only through [`AuthFlag::apply`]; the last
/// event applied wins. Readers take a snapshot and never hold the value.
#[derive(Clone)]
pub struct AuthFlag {
    state: Arc<watch::Sender<bool>>,
}

impl Default for AuthFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFlag {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn apply(&self, event: &AuthEvent) {
        let authenticated = matches!(event, AuthEvent::SignedIn { .. });
        let previous = self.state.send_replace(authenticated);
        if previous != authenticated {
            debug!(authenticated, "auth flag changed");
        }
    }

    pub fn snapshot(&self) -> bool {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Resolves once the flag holds `value`.
    pub async fn wait_for(&self, value: bool) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|current| *current == value).await;
    }
}

/// Feeds auth state changes into `flag` until the auth client goes away.
///
/// The value current at subscription time is applied first, like the
/// backend's initial notification.
pub fn spawn_auth_listener(
    mut users: watch::Receiver<Option<AuthUser>>,
    flag: AuthFlag,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let event = AuthEvent::from_user(users.borrow_and_update().as_ref());
            info!(?event, "auth state changed");
            flag.apply(&event);

            if users.changed().await.is_err() {
                debug!("auth client dropped, stopping auth listener");
                break;
            }
        }
    })
}

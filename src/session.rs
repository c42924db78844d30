//! Identity bootstrap and the process-lifetime session.
//!
//! Sign-in is attempted with an external token first, then anonymously. If
//! both fail the session degrades to a local demo identity so the rest of
//! the system stays usable without a live backend; the failure is logged,
//! never propagated.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::warn;

/// Opaque principal representing the current operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub is_demo: bool,
}

impl Identity {
    /// Locally synthesized fallback identity used when sign-in fails.
    pub fn demo() -> Self {
        Self {
            id: "demo-user".to_string(),
            is_demo: true,
        }
    }
}

/// External identity/session provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_token(&self, token: &str) -> anyhow::Result<Identity>;

    async fn sign_in_anonymously(&self) -> anyhow::Result<Identity>;

    /// Push notifications for identity changes after the initial sign-in
    /// (token refresh, revocation). Each call returns a fresh receiver on
    /// the provider's change channel.
    fn identity_events(&self) -> broadcast::Receiver<Option<Identity>>;
}

/// Owns the current identity for the process lifetime.
///
/// Registers exactly one provider-level listener; `teardown` (or drop)
/// deregisters it. Consumers read the identity through [`current_identity`]
/// or subscribe for changes.
///
/// [`current_identity`]: SessionManager::current_identity
pub struct SessionManager {
    current: Arc<watch::Sender<Option<Identity>>>,
    listener: Option<JoinHandle<()>>,
}

impl SessionManager {
    /// Sign in and start forwarding provider identity events.
    ///
    /// Never fails: the fallback chain ends at [`Identity::demo`].
    pub async fn bootstrap(
        provider: Arc<dyn IdentityProvider>,
        auth_token: Option<&str>,
    ) -> Self {
        let current = Arc::new(watch::Sender::new(None));

        // The one provider-level listener for the process lifetime.
        let mut events = provider.identity_events();
        let listener_tx = Arc::clone(&current);
        let listener = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(identity) => {
                        let _ = listener_tx.send(identity);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let signed_in = match auth_token {
            Some(token) => match provider.sign_in_with_token(token).await {
                Ok(identity) => Some(identity),
                Err(err) => {
                    warn!(error = %err, "token sign-in failed, trying anonymous");
                    Self::try_anonymous(provider.as_ref()).await
                }
            },
            None => Self::try_anonymous(provider.as_ref()).await,
        };

        let identity = signed_in.unwrap_or_else(|| {
            warn!("sign-in unavailable, degrading to demo identity");
            Identity::demo()
        });
        let _ = current.send(Some(identity));

        Self {
            current,
            listener: Some(listener),
        }
    }

    async fn try_anonymous(provider: &dyn IdentityProvider) -> Option<Identity> {
        match provider.sign_in_anonymously().await {
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!(error = %err, "anonymous sign-in failed");
                None
            }
        }
    }

    /// The identity in effect right now, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Watch the identity for changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }

    /// Deregister the provider listener. Idempotent.
    pub fn teardown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

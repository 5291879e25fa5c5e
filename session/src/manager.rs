//! Tokio driver for the session state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionManager` exists per application instance. It is constructed
//! explicitly and passed (or scoped, see `scope`) to whatever needs it. State
//! lives in a `watch` channel: every transition is a single
//! `send_modify`/`send_if_modified` call, and consumers observe changes by
//! subscribing.
//!
//! ERROR HANDLING
//! ==============
//! Storage and profile-fetch failures are logged and swallowed. The UI sees
//! their effect through `user` staying absent once `loading` drops.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{Credentials, IdentityApi, LoginResponse};
use crate::error::ApiError;
use crate::navigate::{LOGIN_ROUTE, Navigator};
use crate::state::{Session, Ticket};
use crate::storage::TokenStore;

/// Shared handle to the session of one application instance.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<Session>,
    api: Arc<dyn IdentityApi>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    /// Create a session seeded from `store`.
    ///
    /// When a token is stored, its profile resolution starts immediately.
    ///
    /// # Panics
    ///
    /// Panics if a token is stored and this is called outside a tokio runtime.
    pub fn new(api: Arc<dyn IdentityApi>, store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let stored = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read stored token; starting signed out");
            None
        });
        let (session, ticket) = Session::from_stored(stored);
        let (state, _) = watch::channel(session);
        let manager = Self { inner: Arc::new(Inner { state, api, store, navigator }) };
        if let Some(ticket) = ticket {
            tracing::debug!(role = %ticket.role, "resuming stored session");
            let _resolution = manager.spawn_resolve(ticket);
        }
        manager
    }

    /// Current session state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Wait until no profile resolution is in flight.
    pub async fn settled(&self) -> Session {
        self.wait_for(|s| !s.loading).await
    }

    /// Wait until the startup resolution has settled.
    pub async fn ready(&self) -> Session {
        self.wait_for(|s| s.ready).await
    }

    /// Adopt a freshly issued token.
    ///
    /// Returns immediately; the returned handle completes once the profile
    /// resolution has been applied or discarded. Dropping it is fine.
    pub fn login(&self, token: impl Into<String>) -> Option<JoinHandle<()>> {
        let token = token.into();
        if let Err(e) = self.inner.store.save(&token) {
            tracing::warn!(error = %e, "failed to persist token");
        }
        let mut ticket = None;
        self.inner.state.send_modify(|s| ticket = s.login(token));
        match ticket {
            Some(ticket) => {
                tracing::info!(role = %ticket.role, "login");
                Some(self.spawn_resolve(ticket))
            }
            None => {
                tracing::warn!("login token carries no readable role; profile not fetched");
                None
            }
        }
    }

    /// Exchange credentials with the identity API, then [`login`](Self::login)
    /// with the issued token.
    ///
    /// # Errors
    ///
    /// Returns the API error when authentication fails; state is untouched.
    pub async fn login_with(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self.inner.api.login(credentials).await?;
        let _resolution = self.login(response.token.clone());
        Ok(response)
    }

    /// Sign out locally and navigate to the login view.
    pub fn logout(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "failed to clear stored token");
        }
        self.inner.state.send_modify(Session::logout);
        tracing::info!("logout");
        self.inner.navigator.navigate(LOGIN_ROUTE);
    }

    /// Re-fetch the profile for the current token. No-op when signed out.
    pub fn refetch_user(&self) -> Option<JoinHandle<()>> {
        let mut ticket = None;
        self.inner.state.send_if_modified(|s| {
            if s.token.is_none() {
                return false;
            }
            ticket = s.refetch();
            true
        });
        ticket.map(|ticket| self.spawn_resolve(ticket))
    }

    fn spawn_resolve(&self, ticket: Ticket) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.resolve(ticket).await })
    }

    async fn wait_for(&self, ready: impl FnMut(&Session) -> bool) -> Session {
        let mut rx = self.inner.state.subscribe();
        match rx.wait_for(ready).await {
            Ok(session) => session.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

impl Inner {
    async fn resolve(&self, ticket: Ticket) {
        let profile = match self.api.fetch_profile(&ticket.role, &ticket.token).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(role = %ticket.role, error = %e, "profile fetch failed");
                None
            }
        };
        if !self.state.send_if_modified(|s| s.apply(&ticket, profile)) {
            tracing::debug!(generation = ticket.generation(), "discarded stale profile response");
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.inner.state.borrow();
        f.debug_struct("SessionManager")
            .field("role", &session.role)
            .field("loading", &session.loading)
            .field("authenticated", &session.is_authenticated())
            .finish_non_exhaustive()
    }
}

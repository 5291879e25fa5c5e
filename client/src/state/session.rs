//! Browser session handle.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionProvider` creates exactly one `SessionContext` per mounted app and
//! provides it to the component subtree. Components read it with
//! `use_session`, which panics outside a provider rather than silently
//! falling back to an empty session.
//!
//! The transitions and the stale-response guard are the `session` crate's
//! `Session` state machine; this module only adds `localStorage` persistence
//! and spawns the profile fetch on the browser task queue.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use session::navigate::LOGIN_ROUTE;
use session::{GatePolicy, Session, Ticket};

use crate::util::storage;

pub(crate) const OUTSIDE_PROVIDER: &str = "use_session called outside of <SessionProvider>; the session is not initialized";

/// Reactive session shared through Leptos context.
#[derive(Clone, Copy, Debug)]
pub struct SessionContext {
    state: RwSignal<Session>,
    gate: GatePolicy,
}

impl SessionContext {
    /// Seed from `localStorage`, provide to the current owner, and start the
    /// stored token's profile resolution.
    pub fn provide(gate: GatePolicy) -> Self {
        let (session, ticket) = Session::from_stored(storage::load_token());
        let ctx = Self { state: RwSignal::new(session), gate };
        provide_context(ctx);
        if let Some(ticket) = ticket {
            ctx.spawn_resolve(ticket);
        }
        ctx
    }

    /// Tracked snapshot of the session.
    pub fn get(self) -> Session {
        self.state.get()
    }

    /// Tracked read without cloning the whole session.
    pub fn with<R>(self, f: impl FnOnce(&Session) -> R) -> R {
        self.state.with(f)
    }

    /// Whether session-dependent children may render right now.
    pub fn should_render(self) -> bool {
        self.state.with(|s| s.should_render(self.gate))
    }

    /// Persist and adopt a freshly issued token.
    pub fn login(self, token: String) {
        storage::save_token(&token);
        let mut ticket = None;
        self.state.update(|s| ticket = s.login(token));
        if let Some(ticket) = ticket {
            self.spawn_resolve(ticket);
        }
    }

    /// Sign out locally and go to the login view.
    pub fn logout<F>(self, navigate: &F)
    where
        F: Fn(&str, NavigateOptions),
    {
        storage::clear_token();
        self.state.update(Session::logout);
        navigate(LOGIN_ROUTE, NavigateOptions::default());
    }

    /// Re-fetch the profile for the current token. No-op when signed out.
    pub fn refetch_user(self) {
        if self.state.with_untracked(|s| s.token.is_none()) {
            return;
        }
        let mut ticket = None;
        self.state.update(|s| ticket = s.refetch());
        if let Some(ticket) = ticket {
            self.spawn_resolve(ticket);
        }
    }

    fn spawn_resolve(self, ticket: Ticket) {
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let profile = crate::net::api::fetch_profile(&ticket.role, &ticket.token).await;
            if !self.state.with_untracked(|s| s.is_current(&ticket)) {
                log::debug!("discarded stale profile response");
                return;
            }
            self.state.update(|s| {
                s.apply(&ticket, profile);
            });
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (self, ticket);
        }
    }
}

/// Session handle of the enclosing `SessionProvider`.
///
/// # Panics
///
/// Panics when no `SessionProvider` encloses the caller.
#[track_caller]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().unwrap_or_else(|| panic!("{OUTSIDE_PROVIDER}"))
}

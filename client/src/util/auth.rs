//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use session::Session;
use session::navigate::LOGIN_ROUTE;

use crate::state::session::SessionContext;

/// Whether a route guard should send the user to the login view.
///
/// A token whose profile failed to load still counts as signed in; pages show
/// an "unknown user" fallback for that case instead of bouncing.
pub fn should_redirect_unauth(session: &Session) -> bool {
    !session.loading && session.token.is_none()
}

/// Whether the login page should forward an already signed-in user.
pub fn should_leave_login(session: &Session) -> bool {
    !session.loading && session.is_authenticated()
}

/// Redirect to `/login` whenever the session has settled without a token.
pub fn install_unauth_redirect<F>(session: SessionContext, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if session.with(should_redirect_unauth) {
            navigate(LOGIN_ROUTE, NavigateOptions::default());
        }
    });
}

//! Scoped provision of the session handle.
//!
//! DESIGN
//! ======
//! Code deep inside a task tree can look the handle up instead of threading it
//! through every call, but only inside a `provide` scope. There is no global
//! fallback: a lookup outside a scope is a wiring bug and `current` panics.
//! Tasks spawned from inside a scope do not inherit it.

#[cfg(test)]
#[path = "scope_test.rs"]
mod scope_test;

use std::future::Future;

use crate::error::SessionError;
use crate::manager::SessionManager;

tokio::task_local! {
    static CURRENT: SessionManager;
}

/// Run `fut` with `manager` available to [`current`] and [`try_current`].
pub async fn provide<F: Future>(manager: SessionManager, fut: F) -> F::Output {
    CURRENT.scope(manager, fut).await
}

/// Look up the session handle of the enclosing scope.
///
/// # Errors
///
/// Returns [`SessionError::OutsideScope`] when no scope encloses the caller.
pub fn try_current() -> Result<SessionManager, SessionError> {
    CURRENT.try_with(SessionManager::clone).map_err(|_| SessionError::OutsideScope)
}

/// Look up the session handle of the enclosing scope.
///
/// # Panics
///
/// Panics when no scope encloses the caller.
#[must_use]
#[track_caller]
pub fn current() -> SessionManager {
    match try_current() {
        Ok(manager) => manager,
        Err(e) => panic!("{e}"),
    }
}

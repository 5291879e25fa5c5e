//! Browser `localStorage` access for the session token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token is the only thing the portal persists client-side. It is stored
//! raw under the shared `token` key so a reload restores the session.
//! Outside the browser these helpers no-op and report no stored token.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

#[cfg(feature = "csr")]
use session::storage::TOKEN_KEY;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Log line for a `localStorage` call that returned an error.
#[cfg(any(test, feature = "csr"))]
fn failure_message(action: &str, err: &impl std::fmt::Debug) -> String {
    format!("failed to {action} session token in localStorage: {err:?}")
}

/// Read the persisted token.
pub fn load_token() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        local_storage()?.get_item(TOKEN_KEY).ok().flatten()
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Persist `token`, replacing any previous value.
pub fn save_token(token: &str) {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = local_storage() else {
            log::warn!("localStorage unavailable; session will not survive reload");
            return;
        };
        if let Err(e) = storage.set_item(TOKEN_KEY, token) {
            log::warn!("{}", failure_message("persist", &e));
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = token;
    }
}

/// Remove the persisted token.
pub fn clear_token() {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = local_storage() else {
            log::warn!("localStorage unavailable; stored token not cleared");
            return;
        };
        if let Err(e) = storage.remove_item(TOKEN_KEY) {
            log::warn!("{}", failure_message("clear", &e));
        }
    }
}

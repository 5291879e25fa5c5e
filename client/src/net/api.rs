//! REST API helpers for communicating with the identity backend.
//!
//! Browser (csr): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning `None`/error since these endpoints are only
//! reachable from the browser app.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Option`/`Result` outputs instead of panics so auth/profile
//! fetch failures degrade UI behavior without crashing the app.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use session::Profile;
use session::Role;
use session::wire::{Credentials, LoginResponse};

/// API base, overridable at build time through `PORTAL_API_BASE`.
const API_BASE: &str = match option_env!("PORTAL_API_BASE") {
    Some(base) => base,
    None => "/api",
};

#[cfg(any(test, feature = "csr"))]
fn endpoint(path: &str) -> String {
    format!("{}{path}", API_BASE.trim_end_matches('/'))
}

#[cfg(any(test, feature = "csr"))]
fn login_failed_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("login failed: {status}")
    } else {
        format!("login failed: {status}: {body}")
    }
}

/// Exchange credentials for a token via `POST /auth/login`.
///
/// # Errors
///
/// Returns an error string if the request fails, the server rejects the
/// credentials, or the response is not a login payload.
pub async fn login(credentials: &Credentials) -> Result<LoginResponse, String> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::post(&endpoint(session::wire::LOGIN_PATH))
            .json(credentials)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            let body = resp.text().await.unwrap_or_default();
            return Err(login_failed_message(resp.status(), &body));
        }
        resp.json::<LoginResponse>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = credentials;
        Err("not available outside the browser".to_owned())
    }
}

/// Fetch the signed-in user's profile from the endpoint matching `role`.
/// Returns `None` on any network, status, or parse failure.
pub async fn fetch_profile(role: &Role, token: &str) -> Option<Profile> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::get(&endpoint(role.profile_path()))
            .header("Authorization", &format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| log::warn!("profile fetch failed: {e}"))
            .ok()?;
        if !resp.ok() {
            log::warn!("profile fetch returned {}", resp.status());
            return None;
        }
        resp.json::<Profile>()
            .await
            .map_err(|e| log::warn!("profile parse failed: {e}"))
            .ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (role, token);
        None
    }
}

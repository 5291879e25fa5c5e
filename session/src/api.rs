//! Remote identity API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The portal backend exposes `POST /auth/login` and one "who-am-I" endpoint
//! per role. `IdentityApi` is the seam the session manager depends on so
//! tests can substitute scripted responses; `HttpIdentityApi` is the real
//! implementation.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use crate::config::{SessionConfig, Timeouts, normalize_base};
use crate::error::ApiError;
use crate::profile::Profile;
use crate::token::Role;
pub use crate::wire::{Credentials, LOGIN_PATH, LoginResponse};

/// Operations the session needs from the identity backend.
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// Exchange credentials for a token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// Fetch the profile of the user `token` was issued to.
    async fn fetch_profile(&self, role: &Role, token: &str) -> Result<Profile, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// `reqwest`-backed identity client.
#[derive(Clone, Debug)]
pub struct HttpIdentityApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityApi {
    /// Build a client for `base_url` with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: normalize_base(base_url) })
    }

    /// Build a client from parsed session config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base, config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let resp = self
            .http
            .post(endpoint_url(&self.base_url, LOGIN_PATH))
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        parse_login_response(&body)
    }

    async fn fetch_profile(&self, role: &Role, token: &str) -> Result<Profile, ApiError> {
        let resp = self
            .http
            .get(endpoint_url(&self.base_url, role.profile_path()))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        parse_profile(&body)
    }
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

fn parse_login_response(body: &str) -> Result<LoginResponse, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn parse_profile(body: &str) -> Result<Profile, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

//! Session configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::state::GatePolicy;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOKEN_FILE: &str = ".portal-session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL of the identity API, without trailing slash.
    pub api_base: String,
    pub timeouts: Timeouts,
    pub gate: GatePolicy,
    pub token_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            timeouts: Timeouts::default(),
            gate: GatePolicy::default(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
        }
    }
}

impl SessionConfig {
    /// Build typed session config from environment variables.
    ///
    /// Optional:
    /// - `PORTAL_API_BASE`: default `http://127.0.0.1:5000/api`
    /// - `PORTAL_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PORTAL_CONNECT_TIMEOUT_SECS`: default 10
    /// - `PORTAL_RENDER_GATE`: `initial` (default) or `every_load`
    /// - `PORTAL_TOKEN_FILE`: default `.portal-session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SessionConfig::from_env`] but reads through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = normalize_base(&lookup("PORTAL_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned()));
        let timeouts = Timeouts {
            request_secs: parse_secs(&lookup, "PORTAL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(&lookup, "PORTAL_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let gate = parse_gate(lookup("PORTAL_RENDER_GATE").as_deref())?;
        let token_file = lookup("PORTAL_TOKEN_FILE").map_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from);
        Ok(Self { api_base, timeouts, gate, token_file })
    }
}

/// Trim whitespace and trailing slashes so endpoint paths can be appended.
#[must_use]
pub fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_secs<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::Invalid { var, value: raw }),
        },
    }
}

fn parse_gate(raw: Option<&str>) -> Result<GatePolicy, ConfigError> {
    match raw.map(str::trim).unwrap_or("initial") {
        "initial" => Ok(GatePolicy::Initial),
        "every_load" => Ok(GatePolicy::EveryLoad),
        other => Err(ConfigError::Invalid { var: "PORTAL_RENDER_GATE", value: other.to_owned() }),
    }
}

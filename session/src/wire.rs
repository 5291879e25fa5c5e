//! Request and response bodies of the identity API's login endpoint.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

pub const LOGIN_PATH: &str = "/auth/login";

/// Login request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

/// Successful login response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<Profile>,
}

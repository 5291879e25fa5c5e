//! Token payload decoding.
//!
//! DESIGN
//! ======
//! Tokens are compact three-segment strings (`header.payload.signature`).
//! The client never verifies signatures; it only reads the payload to learn
//! which role-specific profile endpoint to call. Every failure collapses to
//! `None` so callers can treat "no token" and "unreadable token" alike.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::fmt;

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::profile::{scalar_text, take_field};

/// Unpadded base64url encoder whose decoder tolerates padded input too.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// =============================================================================
// ROLE
// =============================================================================

/// Role claim carried in the token payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Doctor,
    Patient,
    /// Any role this client does not know about yet.
    Other(String),
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Doctor => "doctor",
            Self::Patient => "patient",
            Self::Other(raw) => raw,
        }
    }

    /// Path of the "who-am-I" endpoint serving this role's profile.
    ///
    /// Only doctors have a dedicated endpoint; every other role is served by
    /// the patient endpoint.
    #[must_use]
    pub fn profile_path(&self) -> &'static str {
        match self {
            Self::Doctor => "/doctor/me",
            Self::Patient | Self::Other(_) => "/patient/me",
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        match raw {
            "doctor" => Self::Doctor,
            "patient" => Self::Patient,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

/// Decoded token payload.
///
/// Only `role` matters to the session; the other well-known claims are kept
/// for display and diagnostics, and anything else lands in `extra`. A claim
/// of an unexpected JSON type also stays in `extra`, so it can never hide a
/// readable `role`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Pick the well-known claims out of a payload object.
    #[must_use]
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            role: take_field(&mut map, "role", |v| v.as_str().map(Role::from)),
            sub: take_field(&mut map, "sub", scalar_text),
            id: take_field(&mut map, "id", scalar_text),
            name: take_field(&mut map, "name", scalar_text),
            email: take_field(&mut map, "email", scalar_text),
            exp: take_field(&mut map, "exp", epoch_secs),
            extra: map,
        }
    }
}

impl<'de> Deserialize<'de> for Claims {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

/// Whole seconds of a numeric timestamp; fractional values are truncated.
#[allow(clippy::cast_possible_truncation)]
fn epoch_secs(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().filter(|secs| secs.is_finite()).map(|secs| secs as i64))
}

/// Decode the payload segment of `token`.
///
/// Returns `None` for an absent token, a segment count other than three,
/// invalid base64url, or a payload that is not a JSON object.
#[must_use]
pub fn decode(token: Option<&str>) -> Option<Claims> {
    let token = token?;
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return None;
    };
    let bytes = PAYLOAD_ENGINE.decode(payload).ok()?;
    let payload = serde_json::from_slice::<Map<String, Value>>(&bytes).ok()?;
    Some(Claims::from_map(payload))
}

/// Role claim of `token`, if it decodes and carries one.
#[must_use]
pub fn role_of(token: &str) -> Option<Role> {
    decode(Some(token)).and_then(|claims| claims.role)
}

/// Build an unsigned token around `claims`.
///
/// The header is fixed and the signature segment is a placeholder; this is
/// for fixtures and local tooling, never for talking to a real server.
#[must_use]
pub fn encode_unsigned(claims: &Value) -> String {
    let header = PAYLOAD_ENGINE.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = PAYLOAD_ENGINE.encode(claims.to_string());
    format!("{header}.{payload}.unsigned")
}

//! User profile as returned by the role-specific "who-am-I" endpoints.
//!
//! DESIGN
//! ======
//! Doctor and patient profiles share a handful of display fields; everything
//! role-specific beyond those is kept in `extra` so the session never drops
//! data it does not understand. A body that is not a JSON object fails to
//! deserialize and is treated as "no profile" by the caller.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Profile record for the signed-in user.
///
/// Deserializes from any JSON object. A display field whose value is not a
/// string or number stays in `extra` rather than failing the whole body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Profile {
    /// Server-side identifier, read from `id` or `_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Doctor-only: medical specialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Doctor-only: affiliated hospital name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Pick the display fields out of a profile object.
    #[must_use]
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let id = take_field(&mut map, "id", scalar_text).or_else(|| take_field(&mut map, "_id", scalar_text));
        Self {
            id,
            name: take_field(&mut map, "name", scalar_text),
            email: take_field(&mut map, "email", scalar_text),
            phone: take_field(&mut map, "phone", scalar_text),
            specialization: take_field(&mut map, "specialization", scalar_text),
            hospital: take_field(&mut map, "hospital", scalar_text),
            extra: map,
        }
    }

    /// Name to show in menus, falling back to email and then a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Unknown user")
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

/// Text form of a JSON string or number.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Remove `key` from `map` if `convert` accepts its value. Values of another
/// shape are left where they are.
pub(crate) fn take_field<T>(
    map: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let converted = convert(map.get(key)?)?;
    map.remove(key);
    Some(converted)
}

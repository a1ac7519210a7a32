//! Wire-protocol DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! Field names follow the server's JSON exactly (`access_token` is snake
//! case, password change uses camel case). Optional profile fields tolerate
//! partial user objects because login responses may omit them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// USERS
// =============================================================================

/// Server-assigned user identifier.
///
/// The API emits either integers or strings; both normalize to the decimal or
/// literal string used in `/users/{id}` paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(id) if !id.trim().is_empty() => Ok(Self(id)),
            serde_json::Value::String(_) => Err(D::Error::custom("user id must not be empty")),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Self(int.to_string()));
                }
                if let Some(uint) = number.as_u64() {
                    return Ok(Self(uint.to_string()));
                }
                Err(D::Error::custom("expected integer user id"))
            }
            _ => Err(D::Error::custom("expected string or integer user id")),
        }
    }
}

/// A user as returned by login, registration and `/users/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar image URL; presentation falls back to a default image.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Partial profile update for `PUT /users/{id}`. Absent fields are left as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body returned by both login and registration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Present when the server rotates refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

// =============================================================================
// SHORTENING / HEALTH
// =============================================================================

/// Body for `POST /shorten`. Extra fields are forwarded untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ShortenRequest {
    #[serde(rename = "originalUrl")]
    pub original_url: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ShortenRequest {
    #[must_use]
    pub fn new(original_url: impl Into<String>) -> Self {
        Self { original_url: original_url.into(), extra: serde_json::Map::new() }
    }
}

/// `/health` is the one endpoint allowed to answer in plain text.
#[derive(Clone, Debug, PartialEq)]
pub enum HealthStatus {
    Json(serde_json::Value),
    Text(String),
}

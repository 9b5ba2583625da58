//! Session-related types for dashboard authentication.
//!
//! The backend issues an opaque token at login. It lives in the server-side
//! session until logout or expiry and is never sent to the browser.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque bearer token issued by the toll-gate backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Session-stored operator identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSession {
    /// Username the operator logged in with.
    pub username: String,
    /// Backend token.
    pub token: SessionToken,
    /// When the login succeeded.
    pub issued_at: DateTime<Utc>,
}

impl ApiSession {
    #[must_use]
    pub fn new(username: impl Into<String>, token: SessionToken) -> Self {
        Self {
            username: username.into(),
            token,
            issued_at: Utc::now(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the logged-in operator.
    pub const API_SESSION: &str = "api_session";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let session = ApiSession::new("admin", SessionToken::new("abc.def.ghi".to_string()));
        let debug = format!("{session:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("abc.def.ghi"));
    }

    #[test]
    fn test_session_roundtrips_through_json() {
        let session = ApiSession::new("admin", SessionToken::new("t0k3n".to_string()));
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["token"], "t0k3n");

        let back: ApiSession = serde_json::from_value(value).unwrap();
        assert_eq!(back.token.expose(), "t0k3n");
        assert_eq!(back.username, "admin");
    }
}

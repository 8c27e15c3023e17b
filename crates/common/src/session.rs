//! Anonymous client identity.
//!
//! There are no accounts. Each browser generates a random token, keeps it in
//! local storage and sends it with every request that records a like or a
//! rating. The server treats it as an opaque key and never authenticates it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Header carrying the session token.
pub const SESSION_HEADER: &str = "x-user-session";

/// Longest accepted session token.
pub const MAX_SESSION_LEN: usize = 128;

/// Opaque session token identifying an anonymous client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Parse a raw token. Surrounding whitespace is ignored; blank tokens,
    /// tokens over [`MAX_SESSION_LEN`] characters and tokens containing
    /// control characters are rejected.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let token = raw.trim();

        if token.is_empty() {
            return Err(AppError::validation(SESSION_HEADER, "User session required"));
        }
        if token.chars().count() > MAX_SESSION_LEN {
            return Err(AppError::validation(
                SESSION_HEADER,
                format!("User session must be at most {MAX_SESSION_LEN} characters"),
            ));
        }
        if token.chars().any(char::is_control) {
            return Err(AppError::validation(
                SESSION_HEADER,
                "User session contains invalid characters",
            ));
        }

        Ok(Self(token.to_string()))
    }

    /// Borrow the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Authentication types

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Username/password pair exchanged once for an access token.
///
/// Serializes to the `{"username", "password"}` body the authentication
/// endpoint expects. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token returned by the authentication endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns a short preview safe for logs, e.g. `eyJh…(212 chars)`.
    #[must_use]
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(4).collect();
        format!("{head}…({} chars)", self.0.chars().count())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self.preview())
    }
}

/// Authentication attached to an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: AccessToken,
    },
}

impl AuthConfig {
    /// Creates bearer authentication from a token.
    #[must_use]
    pub const fn bearer(token: AccessToken) -> Self {
        Self::Bearer { token }
    }

    /// Returns the `Authorization` header value, if any.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Bearer { token } => Some(token.header_value()),
        }
    }

    /// Returns true if authentication is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The endpoint answered with a non-success status.
    #[error("authentication rejected with status {status}")]
    Rejected {
        /// HTTP status returned by the endpoint.
        status: u16,
    },
    /// The response carried no usable access token.
    #[error("authentication response did not contain an access token")]
    MissingToken,
    /// The request never produced a response.
    #[error("network error during authentication: {message}")]
    Transport {
        /// Error description.
        message: String,
    },
}

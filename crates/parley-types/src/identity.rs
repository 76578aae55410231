//! User identity keys.
//!
//! A user is addressed by the local part of their email address, trimmed and
//! lowercased. There is no authentication: this is only key derivation, and
//! two emails sharing a local part (`ada@x.com`, `Ada@y.org`) map to the same
//! user.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Stable document key for a user, derived from an email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    /// Derive the user key from an email address.
    ///
    /// The email is trimmed first; it must be non-empty and contain `@`.
    /// The local part must itself be non-empty and free of `/` so that it
    /// can address a document.
    pub fn from_email(email: &str) -> Result<Self, RelayError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(RelayError::InvalidEmail);
        }

        let (local, _domain) = email.split_once('@').ok_or(RelayError::InvalidEmail)?;
        let key = local.trim().to_lowercase();
        if key.is_empty() || key.contains('/') {
            return Err(RelayError::InvalidEmail);
        }

        Ok(Self(key))
    }

    /// Wrap a raw username taken verbatim from a request path.
    ///
    /// Used by the history endpoints, which address users by the literal
    /// path parameter rather than by a derived key.
    pub fn from_raw(username: &str) -> Self {
        Self(username.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

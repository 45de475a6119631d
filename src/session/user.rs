//! Session record and login credentials.

use serde::{Deserialize, Serialize};

use crate::{GrocefyError, Result};

/// Display name used when a login does not supply one.
pub const FALLBACK_NAME: &str = "Saachi";

/// The logged-in user.
///
/// This is the exact shape mirrored to durable storage:
/// `{"name": "...", "email": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Display name.
    pub name: String,
    /// Email address the user logged in with.
    pub email: String,
}

impl SessionUser {
    /// Build the session record for a login.
    ///
    /// A missing or blank name is replaced by [`FALLBACK_NAME`].
    pub fn from_credentials(credentials: Credentials) -> Self {
        let name = credentials
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        Self {
            name,
            email: credentials.email,
        }
    }

    /// Parse a stored record.
    ///
    /// Anything that is not an object with string `name` and `email` fields
    /// is rejected. Extra fields are ignored.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(GrocefyError::MalformedSession(format!(
                "expected a JSON object, found {value}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize for durable storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Validated login input accepted by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Optional display name (sign-up supplies one, login does not).
    pub name: Option<String>,
    /// Email address.
    pub email: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

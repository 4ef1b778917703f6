//! Session domain model.
//!
//! A [`Session`] is the client-held record of authentication state: the
//! opaque token issued by the API, the identity returned with it, and the set
//! of permission names granted to that identity.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{BlogdeskError, Result};

/// Identity information returned by the API alongside a token.
///
/// Only `name` and `email` are interpreted; every other field the server
/// sends is kept in `extra` so it survives a save/load cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            extra: Map::new(),
        }
    }

    /// Name if present, otherwise email, otherwise `None`.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.email.as_deref())
    }
}

/// Permission names in any of the shapes the API (or older persisted state)
/// has been seen to use.
///
/// - a JSON array; only its string elements are permission names
/// - a single string, which may be a comma-joined list
///
/// Deserialization never fails on an odd shape: non-string array elements
/// are skipped and any other JSON value reads as an empty list, so a
/// malformed permission field cannot discard the token it came with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PermissionField {
    List(Vec<String>),
    Text(String),
}

impl PermissionField {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => PermissionField::Text(text),
            Value::Array(items) => PermissionField::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(name) => Some(name),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => PermissionField::List(Vec::new()),
        }
    }

    /// Collects into a set.
    ///
    /// List elements are kept exactly as sent. Only the legacy comma-joined
    /// text is split, with each piece trimmed and blank pieces dropped.
    pub fn into_set(self) -> BTreeSet<String> {
        match self {
            PermissionField::List(items) => items.into_iter().collect(),
            PermissionField::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for PermissionField {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(PermissionField::from_value)
    }
}

/// The current authentication state.
///
/// Invariant: `token` is present iff the session is authenticated, and an
/// unauthenticated session carries neither a user nor any permissions. The
/// fields are private so the invariant can only be established through
/// [`Session::unauthenticated`] and [`Session::authenticated`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<UserIdentity>,
    permissions: BTreeSet<String>,
}

impl Session {
    /// The empty session: no token, no user, no permissions.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// Builds an authenticated session.
    ///
    /// # Errors
    ///
    /// Returns `BlogdeskError::Security` when `token` is empty or blank.
    pub fn authenticated<I, S>(token: impl Into<String>, user: UserIdentity, permissions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(BlogdeskError::security(
                "an authenticated session requires a non-empty token",
            ));
        }

        Ok(Self {
            token: Some(token),
            user: Some(user),
            permissions: permissions.into_iter().map(Into::into).collect(),
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

//! Wire shape of the login/register responses.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::AuthError;
use crate::session::{PermissionField, Session, UserIdentity};

/// Body returned by `/auth/login` and `/auth/register`.
///
/// The API is loose about where identity and permissions live: name and email
/// may sit at the top level or inside a nested `user` object, and permissions
/// show up under `permissions` or `permission`. Both spellings are accepted;
/// `permissions` wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user: Option<Map<String, Value>>,
    #[serde(default)]
    pub permissions: Option<PermissionField>,
    #[serde(default)]
    pub permission: Option<PermissionField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthResponse {
    /// Converts the payload into a session.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidResponse` when the payload carries no usable token.
    pub fn into_session(self) -> Result<Session, AuthError> {
        let token = self
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AuthError::invalid_response("response carries no token"))?;

        let mut identity = UserIdentity {
            name: self.name,
            email: self.email,
            extra: self.extra,
        };

        if let Some(mut nested) = self.user {
            let nested_name = take_string(&mut nested, "name");
            let nested_email = take_string(&mut nested, "email");
            identity.name = identity.name.or(nested_name);
            identity.email = identity.email.or(nested_email);
            for (key, value) in nested {
                if RESERVED_KEYS.contains(&key.as_str()) {
                    continue;
                }
                identity.extra.entry(key).or_insert(value);
            }
        }

        let permissions = self
            .permissions
            .or(self.permission)
            .map(PermissionField::into_set)
            .unwrap_or_default();

        Session::authenticated(token, identity, permissions)
            .map_err(|e| AuthError::invalid_response(e.to_string()))
    }
}

/// Top-level keys with a meaning of their own; a nested `user` object may not
/// shadow them through `extra`.
const RESERVED_KEYS: [&str; 6] = ["token", "name", "email", "user", "permissions", "permission"];

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

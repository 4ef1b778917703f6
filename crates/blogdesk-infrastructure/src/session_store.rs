//! Session store over a key-value backend.
//!
//! Layout (three independent entries):
//!
//! | key          | content                                                    |
//! |--------------|------------------------------------------------------------|
//! | `authData`   | JSON: token, identity fields and `permissions` array       |
//! | `token`      | raw token string                                           |
//! | `permission` | JSON array of permission names                             |
//!
//! `token` decides whether a session exists. `authData` is the source for
//! identity and permissions; `permission` is only consulted when `authData`
//! carries no permissions (older layouts stored the raw server field there,
//! sometimes as a comma-joined string).

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use blogdesk_core::BlogdeskError;
use blogdesk_core::auth::AuthResponse;
use blogdesk_core::error::Result;
use blogdesk_core::session::{PermissionField, Session, SessionStore, UserIdentity};

use crate::storage::KeyValueStore;

pub const AUTH_DATA_KEY: &str = "authData";
pub const TOKEN_KEY: &str = "token";
pub const PERMISSION_KEY: &str = "permission";

/// The `authData` entry as written.
#[derive(Serialize)]
struct AuthDataEntry<'a> {
    token: &'a str,
    #[serde(flatten)]
    user: &'a UserIdentity,
    permissions: &'a BTreeSet<String>,
}

/// [`SessionStore`] writing the three entries to any [`KeyValueStore`].
pub struct KeyValueSessionStore<K> {
    backend: Arc<K>,
}

impl<K> Clone for KeyValueSessionStore<K> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<K: KeyValueStore + 'static> KeyValueSessionStore<K> {
    pub fn new(backend: K) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    fn save_blocking(backend: &K, session: &Session) -> Result<()> {
        let Some(token) = session.token() else {
            return Self::clear_blocking(backend);
        };

        let default_user = UserIdentity::default();
        let entry = AuthDataEntry {
            token,
            user: session.user().unwrap_or(&default_user),
            permissions: session.permissions(),
        };
        let auth_data = serde_json::to_string(&entry)?;
        let permission = serde_json::to_string(session.permissions())?;

        // Sequential and best-effort: a crash between these writes leaves a
        // mix of generations, which load() resolves by trusting `token`.
        backend.set(AUTH_DATA_KEY, &auth_data)?;
        backend.set(TOKEN_KEY, token)?;
        backend.set(PERMISSION_KEY, &permission)?;
        Ok(())
    }

    fn clear_blocking(backend: &K) -> Result<()> {
        let mut first_error = None;
        // `token` first: it alone decides whether a session exists.
        for key in [TOKEN_KEY, AUTH_DATA_KEY, PERMISSION_KEY] {
            if let Err(e) = backend.remove(key) {
                tracing::warn!("[SessionStore] Failed to remove '{}': {}", key, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn load_blocking(backend: &K) -> Session {
        match Self::try_load(backend) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(
                    "[SessionStore] Discarding unreadable persisted session: {}",
                    e
                );
                Session::unauthenticated()
            }
        }
    }

    fn try_load(backend: &K) -> Result<Session> {
        let Some(token) = backend
            .get(TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty())
        else {
            return Ok(Session::unauthenticated());
        };

        let mut payload = match backend.get(AUTH_DATA_KEY)? {
            Some(raw) => serde_json::from_str::<AuthResponse>(&raw)?,
            None => AuthResponse::default(),
        };

        if payload.permissions.is_none() && payload.permission.is_none() {
            payload.permission = backend
                .get(PERMISSION_KEY)?
                .map(|raw| parse_permission_entry(&raw));
        }

        payload.token = Some(token);
        payload
            .into_session()
            .map_err(|e| BlogdeskError::internal(e.to_string()))
    }
}

/// JSON array when written by this store; anything else is taken as the
/// legacy comma-joined text.
fn parse_permission_entry(raw: &str) -> PermissionField {
    serde_json::from_str::<PermissionField>(raw)
        .unwrap_or_else(|_| PermissionField::Text(raw.to_string()))
}

#[async_trait]
impl<K: KeyValueStore + 'static> SessionStore for KeyValueSessionStore<K> {
    async fn save(&self, session: &Session) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        let session = session.clone();
        tokio::task::spawn_blocking(move || Self::save_blocking(&backend, &session))
            .await
            .map_err(|e| BlogdeskError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn load(&self) -> Session {
        let backend = Arc::clone(&self.backend);
        match tokio::task::spawn_blocking(move || Self::load_blocking(&backend)).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("[SessionStore] Load task failed: {}", e);
                Session::unauthenticated()
            }
        }
    }

    async fn clear(&self) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || Self::clear_blocking(&backend))
            .await
            .map_err(|e| BlogdeskError::internal(format!("Failed to join task: {}", e)))?
    }
}

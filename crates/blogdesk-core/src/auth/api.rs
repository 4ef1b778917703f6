//! Remote auth API trait.

use async_trait::async_trait;

use super::credentials::{LoginCredentials, RegisterProfile};
use super::error::AuthError;
use super::response::AuthResponse;

/// The remote endpoints that issue sessions.
///
/// Implementations perform exactly one request per call and do not retry;
/// retry decisions belong to the caller (see [`AuthError::is_retryable`]).
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, AuthError>;

    /// `POST /auth/register`. A successful registration is also a login.
    async fn register(&self, profile: &RegisterProfile) -> Result<AuthResponse, AuthError>;
}

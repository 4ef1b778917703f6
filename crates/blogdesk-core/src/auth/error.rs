//! Authentication error type.

use thiserror::Error;

/// Why a login or registration did not produce a session.
///
/// Every variant leaves the current session untouched; the caller only has
/// to decide what to show.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The API could not be reached (DNS, connection refused, TLS, ...).
    #[error("Could not reach the API: {message}")]
    Transport { message: String },

    /// The request did not complete within the configured timeout.
    #[error("The API did not answer within {secs}s")]
    Timeout { secs: u64 },

    /// The API answered with a non-success status (bad credentials,
    /// validation failure, server error).
    #[error("The API rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The API answered 2xx but the body is not a usable session payload.
    #[error("The API returned an invalid session payload: {0}")]
    InvalidResponse(String),

    /// A session-bearing request was attempted without a token.
    #[error("Not logged in")]
    Unauthenticated,

    #[error("The auth session manager was already initialized")]
    AlreadyInitialized,

    #[error("The auth session manager has not been initialized")]
    NotInitialized,
}

impl AuthError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Whether retrying the same request later could succeed.
    ///
    /// Rejections are retryable only for throttling and server-side statuses;
    /// a 401 with the same credentials will keep failing.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_)
            | Self::Unauthenticated
            | Self::AlreadyInitialized
            | Self::NotInitialized => false,
        }
    }

    /// True for 401/403 answers, i.e. the credentials themselves were refused.
    pub fn is_credentials_rejected(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }
}

//! Thin REST client over `reqwest`.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use blogdesk_core::auth::AuthError;
use blogdesk_core::config::ClientConfig;
use blogdesk_core::error::{BlogdeskError, Result};
use blogdesk_core::session::Session;

/// REST client bound to one API base URL.
///
/// Every request carries the configured timeout. Session-bearing requests
/// go through [`RestClient::get_authorized`], which attaches the bearer token.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BlogdeskError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` joined with `path`; a leading slash on `path` is optional.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POSTs `body` as JSON and decodes a JSON answer.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> std::result::Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("[RestClient] POST {}", url);
        self.send(self.client.post(&url).json(body)).await
    }

    /// GETs `path` with `Authorization: Bearer <token>` and returns the JSON
    /// body. Refuses to send anything when the session carries no token.
    pub async fn get_authorized(
        &self,
        path: &str,
        session: &Session,
    ) -> std::result::Result<Value, AuthError> {
        let token = session.token().ok_or(AuthError::Unauthenticated)?;
        let url = self.url(path);
        tracing::debug!("[RestClient] GET {}", url);
        self.send(self.client.get(&url).bearer_auth(token)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, AuthError> {
        let response = request
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        if !status.is_success() {
            return Err(map_http_error(status, body));
        }

        serde_json::from_str(&body)
            .map_err(|err| AuthError::invalid_response(format!("Failed to parse API response: {err}")))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AuthError {
        if err.is_timeout() {
            AuthError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            AuthError::transport(format!("API request failed: {err}"))
        }
    }
}

/// Non-2xx answer to [`AuthError::Rejected`], preferring the server's
/// `message` (or `error`) field over the raw body.
fn map_http_error(status: StatusCode, body: String) -> AuthError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body
            }
        });

    AuthError::rejected(status.as_u16(), message)
}

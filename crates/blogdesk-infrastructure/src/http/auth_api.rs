use async_trait::async_trait;

use blogdesk_core::auth::{AuthApi, AuthError, AuthResponse, LoginCredentials, RegisterProfile};

use super::client::RestClient;

const LOGIN_PATH: &str = "auth/login";
const REGISTER_PATH: &str = "auth/register";

/// [`AuthApi`] over the REST endpoints `POST /auth/login` and
/// `POST /auth/register`.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: RestClient,
}

impl HttpAuthApi {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, AuthError> {
        self.client.post_json(LOGIN_PATH, credentials).await
    }

    async fn register(&self, profile: &RegisterProfile) -> Result<AuthResponse, AuthError> {
        self.client.post_json(REGISTER_PATH, profile).await
    }
}

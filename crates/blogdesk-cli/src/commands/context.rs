use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use blogdesk_application::AuthSessionManager;
use blogdesk_core::Session;
use blogdesk_infrastructure::storage::FileKeyValueStore;
use blogdesk_infrastructure::{BlogdeskPaths, ConfigService, HttpAuthApi, KeyValueSessionStore, RestClient};

/// Everything a command needs, wired from the configuration.
pub struct AppContext {
    pub client: RestClient,
    pub manager: AuthSessionManager,
}

impl AppContext {
    /// Loads the configuration, wires the store and API, and restores the
    /// persisted session.
    pub async fn load(config_dir: Option<&Path>) -> Result<Self> {
        let service = ConfigService::new(BlogdeskPaths::new(config_dir));
        let config = service
            .get_config()
            .context("Failed to load configuration")?;
        let storage_dir = service
            .storage_dir(&config)
            .context("Failed to resolve the session directory")?;

        let client = RestClient::new(&config).context("Failed to create the API client")?;
        let store = KeyValueSessionStore::new(FileKeyValueStore::new(storage_dir));
        let manager = AuthSessionManager::new(
            Arc::new(store),
            Arc::new(HttpAuthApi::new(client.clone())),
        );
        manager
            .initialize()
            .await
            .context("Failed to restore the session")?;

        tracing::debug!("[Cli] Using API at {}", config.api_base_url);
        Ok(Self { client, manager })
    }

    pub fn session(&self) -> Arc<Session> {
        self.manager.current_session()
    }
}

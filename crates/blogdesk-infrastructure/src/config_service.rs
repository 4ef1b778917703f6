//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` (see [`BlogdeskPaths`]), then
//! applies environment overrides:
//!
//! - `BLOGDESK_API_URL`
//! - `BLOGDESK_TIMEOUT_SECS`
//! - `BLOGDESK_STORAGE_DIR`

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use blogdesk_core::config::ClientConfig;
use blogdesk_core::error::{BlogdeskError, Result};

use crate::paths::BlogdeskPaths;
use crate::storage::AtomicTomlFile;

pub const ENV_API_URL: &str = "BLOGDESK_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BLOGDESK_TIMEOUT_SECS";
pub const ENV_STORAGE_DIR: &str = "BLOGDESK_STORAGE_DIR";

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: BlogdeskPaths,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: BlogdeskPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn paths(&self) -> &BlogdeskPaths {
        &self.paths
    }

    /// Returns the effective configuration, reading the file on first access.
    ///
    /// A missing or empty file yields the defaults; a malformed one is an
    /// error rather than a silent reset.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Some(cached) = self.read_cache()? {
            return Ok(cached);
        }

        let config = self.resolve(|key| std::env::var(key).ok())?;

        *self.write_cache()? = Some(config.clone());
        Ok(config)
    }

    /// Writes `config` to `config.toml` and drops the cached copy.
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        config.validate()?;
        let file = AtomicTomlFile::<ClientConfig>::new(self.paths.config_file()?);
        file.save(config)?;
        tracing::info!("[ConfigService] Saved config to {}", file.path().display());

        self.invalidate_cache()
    }

    pub fn invalidate_cache(&self) -> Result<()> {
        *self.write_cache()? = None;
        Ok(())
    }

    /// Directory for the persisted session entries.
    pub fn storage_dir(&self, config: &ClientConfig) -> Result<PathBuf> {
        match &config.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.paths.session_dir()?),
        }
    }

    /// File contents with the overrides from `lookup` applied, validated.
    fn resolve<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let file = AtomicTomlFile::<ClientConfig>::new(self.paths.config_file()?);
        match file.load()? {
            Some(config) => {
                tracing::debug!("[ConfigService] Loaded {}", file.path().display());
                Ok(config)
            }
            None => Ok(ClientConfig::default()),
        }
    }

    fn read_cache(&self) -> Result<Option<ClientConfig>> {
        self.config
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| BlogdeskError::internal(format!("config cache lock poisoned: {}", e)))
    }

    fn write_cache(&self) -> Result<std::sync::RwLockWriteGuard<'_, Option<ClientConfig>>> {
        self.config
            .write()
            .map_err(|e| BlogdeskError::internal(format!("config cache lock poisoned: {}", e)))
    }
}

/// Applies the `BLOGDESK_*` overrides found through `lookup`. Blank values are
/// ignored.
pub fn apply_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = get(ENV_API_URL) {
        config.api_base_url = url.trim().to_string();
    }

    if let Some(secs) = get(ENV_TIMEOUT_SECS) {
        config.request_timeout_secs = secs.trim().parse().map_err(|_| {
            BlogdeskError::config(format!(
                "{} must be a whole number of seconds, got {:?}",
                ENV_TIMEOUT_SECS, secs
            ))
        })?;
    }

    if let Some(dir) = get(ENV_STORAGE_DIR) {
        config.storage_dir = Some(PathBuf::from(dir));
    }

    Ok(())
}

//! Unified path management for blogdesk files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/blogdesk/          # Config directory (platform default)
//! ├── config.toml              # Client configuration
//! └── session/                 # Persisted session entries
//!     ├── authData
//!     ├── token
//!     └── permission
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find the platform config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for blogdesk_core::BlogdeskError {
    fn from(err: PathError) -> Self {
        blogdesk_core::BlogdeskError::config(err.to_string())
    }
}

const APP_DIR_NAME: &str = "blogdesk";

/// Path resolution rooted either at the platform config directory or at an
/// explicit base directory (tests, `--config-dir`).
#[derive(Debug, Clone, Default)]
pub struct BlogdeskPaths {
    base: Option<PathBuf>,
}

impl BlogdeskPaths {
    /// `base = None` resolves under the platform config directory.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the blogdesk configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/blogdesk/`, or the explicit base
    /// - `Err(PathError::ConfigDirNotFound)`: no base given and the platform
    ///   directory could not be determined
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Default directory for the persisted session entries.
    pub fn session_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session"))
    }
}

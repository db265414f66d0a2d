//! File-based configuration provider (YAML)
//!
//! Reads `~/.config/toolrelay/config.yaml` by default. The file is written by
//! the host's settings UI; the relay only reads it.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::Settings;
use super::traits::{ConfigProvider, ConfigResult};

/// YAML file configuration provider
///
/// The parsed file is cached until `reload` is called.
///
/// # Example
///
/// ```no_run
/// use toolrelay_core::config::FileConfigProvider;
///
/// let user_config = FileConfigProvider::user();
/// let project_config = FileConfigProvider::new("/path/to/project/toolrelay.yaml");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    cache: RwLock<Option<Settings>>,
}

impl FileConfigProvider {
    /// Create a provider for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Create a user-level provider (~/.config/toolrelay/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("toolrelay").join("config.yaml"))
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Parse the file; a missing file yields the default settings
    fn read(&self) -> ConfigResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Re-read the file, replacing the cache
    pub fn reload(&self) -> ConfigResult<Settings> {
        let settings = self.read()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn load(&self) -> ConfigResult<Settings> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }
        self.reload()
    }
}

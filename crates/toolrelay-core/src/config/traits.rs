//! Configuration provider trait

use async_trait::async_trait;

use super::settings::Settings;

/// Source of relay settings
///
/// Settings are plain data owned by the host; the relay only reads them.
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory, set by the host or by tests
/// - `FileConfigProvider`: YAML file (~/.config/toolrelay/config.yaml)
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Load the current settings
    async fn load(&self) -> ConfigResult<Settings>;
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Duplicate provider id: {0}")]
    DuplicateProvider(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

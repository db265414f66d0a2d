//! In-memory configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::Settings;
use super::traits::{ConfigProvider, ConfigResult};

/// Settings held in memory, replaced wholesale by the host
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    settings: RwLock<Settings>,
}

impl MemoryConfigProvider {
    /// Create a provider holding the default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding `settings`
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Replace the settings
    pub fn set_settings(&self, settings: Settings) {
        *self.settings.write() = settings;
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn load(&self) -> ConfigResult<Settings> {
        let settings = self.settings.read().clone();
        settings.validate()?;
        Ok(settings)
    }
}

//! Profiles and the provider registry

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::provider::ProviderConfig;
use super::traits::{ConfigError, ConfigResult};

pub const DEFAULT_PROFILE_NAME: &str = "default";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. You can use external tools when they help answer the user.";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// A named set of chat preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_model")]
    pub selected_model: String,
    /// Ids from the provider registry to connect while this profile is active
    #[serde(default)]
    pub enabled_providers: Vec<String>,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_NAME)
    }
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: default_system_prompt(),
            selected_model: default_model(),
            enabled_providers: Vec::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.selected_model = model.into();
        self
    }

    pub fn with_enabled_providers(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enabled_providers = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Everything the relay reads from the host's configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    #[serde(default = "default_profile_name")]
    pub active_profile: String,
    /// Every known provider; profiles pick from it by id
    #[serde(default)]
    pub provider_registry: Vec<ProviderConfig>,
}

fn default_profile_name() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE_NAME.to_string(), Profile::default());
        Self {
            profiles,
            active_profile: default_profile_name(),
            provider_registry: Vec::new(),
        }
    }
}

impl Settings {
    /// The active profile, or the built-in default when it is missing
    pub fn active_profile(&self) -> Profile {
        self.profiles
            .get(&self.active_profile)
            .cloned()
            .unwrap_or_default()
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> ConfigResult<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Registry entry by id
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.provider_registry.iter().find(|p| p.id() == id)
    }

    /// Configs enabled by `profile`, in the profile's order
    ///
    /// Ids with no registry entry are skipped; see `unknown_providers`.
    pub fn enabled_provider_configs(&self, profile: &Profile) -> Vec<ProviderConfig> {
        profile
            .enabled_providers
            .iter()
            .filter_map(|id| self.provider(id).cloned())
            .collect()
    }

    /// Ids enabled by `profile` that the registry does not know
    pub fn unknown_providers(&self, profile: &Profile) -> Vec<String> {
        profile
            .enabled_providers
            .iter()
            .filter(|id| self.provider(id).is_none())
            .cloned()
            .collect()
    }

    /// Provider ids must be unique across the registry
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for provider in &self.provider_registry {
            if !seen.insert(provider.id()) {
                return Err(ConfigError::DuplicateProvider(provider.id().to_string()));
            }
        }
        Ok(())
    }
}

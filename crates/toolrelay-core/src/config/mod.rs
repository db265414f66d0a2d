//! Configuration: which providers exist, which profile is active
//!
//! Sources:
//! - `MemoryConfigProvider`: In-memory, owned by the host
//! - `FileConfigProvider`: YAML file-based

mod traits;
mod provider;
mod settings;
mod memory;
mod file;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use provider::{ProviderConfig, StdioProviderConfig, NetworkProviderConfig};
pub use settings::{Settings, Profile, DEFAULT_PROFILE_NAME, DEFAULT_SYSTEM_PROMPT, DEFAULT_MODEL};
pub use memory::MemoryConfigProvider;
pub use file::FileConfigProvider;

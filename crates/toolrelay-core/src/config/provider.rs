//! Tool-provider configuration

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A tool provider the relay can connect to
///
/// Serialized with a `type` tag:
///
/// ```yaml
/// - type: stdio
///   id: fs
///   name: Filesystem
///   command: ./servers/fs.py
///   args: ["--root", "/tmp"]
/// - type: network
///   id: search
///   name: Search
///   url: https://tools.example.com/mcp
///   credentials: secret-token
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Local process speaking the protocol over stdin/stdout
    Stdio(StdioProviderConfig),
    /// Remote service reached by URL
    #[serde(alias = "sse", alias = "http")]
    Network(NetworkProviderConfig),
}

/// Subprocess-backed provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdioProviderConfig {
    pub id: String,
    pub name: String,
    /// Executable, or a script resolved through an interpreter
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Network-backed provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkProviderConfig {
    pub id: String,
    pub name: String,
    /// `http(s)://` for Streamable HTTP, `unix://<path>` for a local socket
    pub url: String,
    /// Sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProviderConfig {
    /// Stdio provider with no arguments
    pub fn stdio(id: impl Into<String>, name: impl Into<String>, command: impl Into<String>) -> Self {
        ProviderConfig::Stdio(StdioProviderConfig {
            id: id.into(),
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            description: None,
        })
    }

    /// Network provider without credentials
    pub fn network(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        ProviderConfig::Network(NetworkProviderConfig {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            credentials: None,
            description: None,
        })
    }

    /// Set arguments (stdio providers only)
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        if let ProviderConfig::Stdio(ref mut c) = self {
            c.args = args.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Set credentials (network providers only)
    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        if let ProviderConfig::Network(ref mut c) = self {
            c.credentials = Some(credentials.into());
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            ProviderConfig::Stdio(c) => &c.id,
            ProviderConfig::Network(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProviderConfig::Stdio(c) => &c.name,
            ProviderConfig::Network(c) => &c.name,
        }
    }

    /// Transport kind as written in config files
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderConfig::Stdio(_) => "stdio",
            ProviderConfig::Network(_) => "network",
        }
    }
}

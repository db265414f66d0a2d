//! Connection records owned by the registry

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::types::ToolInfo;

/// Lifecycle state of one provider connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    /// The last attempt failed; connect again to retry
    Error,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Snapshot of one provider connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub id: String,
    pub config: ProviderConfig,
    pub status: ConnectionStatus,
    /// Capability list; only meaningful while `Connected`
    pub tools: Vec<ToolInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ConnectionInfo {
    pub(crate) fn connecting(config: &ProviderConfig) -> Self {
        Self {
            id: config.id().to_string(),
            config: config.clone(),
            status: ConnectionStatus::Connecting,
            tools: Vec::new(),
            last_error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Tools callers may use; empty unless connected
    pub fn usable_tools(&self) -> &[ToolInfo] {
        if self.is_connected() {
            &self.tools
        } else {
            &[]
        }
    }

    /// Compact status line for display
    pub fn summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            id: self.id.clone(),
            name: self.config.name().to_string(),
            status: self.status,
            tool_count: self.usable_tools().len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Per-provider status for display and debugging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    pub id: String,
    pub name: String,
    pub status: ConnectionStatus,
    pub tool_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// A tool and the provider that owns it
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTool {
    pub provider_id: String,
    pub tool: ToolInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_hidden_unless_connected() {
        let mut info = ConnectionInfo::connecting(&ProviderConfig::stdio("fs", "Files", "mcp-fs"));
        info.tools = vec![ToolInfo::new("read", "Read a file")];
        assert!(info.usable_tools().is_empty());
        assert_eq!(info.summary().tool_count, 0);

        info.status = ConnectionStatus::Connected;
        assert_eq!(info.usable_tools().len(), 1);
        assert_eq!(info.summary().name, "Files");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&ConnectionStatus::Error).unwrap(), r#""error""#);
        assert_eq!(ConnectionStatus::Connecting.to_string(), "connecting");
    }
}

//! Provider session abstraction
//!
//! The registry talks to providers only through these traits. The default
//! implementation speaks MCP via rmcp (`McpClient` / `McpConnector`); hosts
//! and tests can plug in anything else that lists and calls tools.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::types::ToolInfo;

/// Provider connection and protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Failed to spawn provider: {0}")]
    SpawnFailed(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("Unsupported provider: {0}")]
    Unsupported(String),

    #[error("{operation} timed out after {}ms", .after.as_millis())]
    Timeout { operation: String, after: Duration },

    #[error("Session closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type McpResult<T> = Result<T, McpError>;

/// Raw outcome of a remote tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Structured content if the provider sent any, else the content list
    pub content: Value,
    /// Text parts of the content, newline-joined
    pub text: String,
    /// Provider flagged the call as failed
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output carrying `content`
    pub fn success(content: Value) -> Self {
        let text = match &content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            content,
            text,
            is_error: false,
        }
    }

    /// Provider-reported failure
    pub fn error(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            content: Value::String(text.clone()),
            text,
            is_error: true,
        }
    }
}

/// An established connection to one provider
#[async_trait]
pub trait ProviderSession: Send + Sync {
    /// Ask the provider for its capability list
    async fn list_tools(&self) -> McpResult<Vec<ToolInfo>>;

    /// Invoke `name` with `arguments`
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput>;

    /// Close the underlying transport; calling twice is harmless
    async fn close(&self) -> McpResult<()>;
}

/// Opens sessions for provider configs
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    /// Establish the transport and complete the protocol handshake
    async fn connect(&self, config: &ProviderConfig) -> McpResult<Arc<dyn ProviderSession>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_output_constructors() {
        let ok = ToolOutput::success(json!({ "sum": 4 }));
        assert!(!ok.is_error);
        assert_eq!(ok.text, r#"{"sum":4}"#);

        let plain = ToolOutput::success(json!("done"));
        assert_eq!(plain.text, "done");

        let err = ToolOutput::error("disk full");
        assert!(err.is_error);
        assert_eq!(err.content, json!("disk full"));
    }
}

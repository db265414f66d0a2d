//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use toolrelay_core::config::ProviderConfig;
use toolrelay_core::mcp::{McpError, McpResult, ProviderConnector, ProviderSession, ToolOutput};
use toolrelay_core::types::ToolInfo;

type Handler = Arc<dyn Fn(&Map<String, Value>) -> McpResult<ToolOutput> + Send + Sync>;

/// A provider living in the test process
#[derive(Clone, Default)]
pub struct InProcessProvider {
    tools: Vec<(ToolInfo, Handler)>,
}

impl InProcessProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool<F>(mut self, info: ToolInfo, handler: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> McpResult<ToolOutput> + Send + Sync + 'static,
    {
        self.tools.push((info, Arc::new(handler)));
        self
    }
}

/// Serves `InProcessProvider`s by id; unknown ids fail to spawn
#[derive(Default)]
pub struct InProcessConnector {
    providers: HashMap<String, InProcessProvider>,
}

impl InProcessConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, id: &str, provider: InProcessProvider) -> Self {
        self.providers.insert(id.to_string(), provider);
        self
    }
}

#[async_trait]
impl ProviderConnector for InProcessConnector {
    async fn connect(&self, config: &ProviderConfig) -> McpResult<Arc<dyn ProviderSession>> {
        match self.providers.get(config.id()) {
            Some(provider) => Ok(Arc::new(provider.clone())),
            None => Err(McpError::SpawnFailed(format!("{}: not found", config.id()))),
        }
    }
}

#[async_trait]
impl ProviderSession for InProcessProvider {
    async fn list_tools(&self) -> McpResult<Vec<ToolInfo>> {
        Ok(self.tools.iter().map(|(info, _)| info.clone()).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput> {
        let (_, handler) = self
            .tools
            .iter()
            .find(|(info, _)| info.name == name)
            .ok_or_else(|| McpError::ToolCallFailed(format!("unknown tool {}", name)))?;
        handler(&arguments)
    }

    async fn close(&self) -> McpResult<()> {
        Ok(())
    }
}

/// Calculator provider with an `add` tool requiring integer `a` and `b`
pub fn calculator() -> InProcessProvider {
    let schema = json!({
        "type": "object",
        "properties": { "a": { "type": "integer" }, "b": { "type": "integer" } },
        "required": ["a", "b"]
    });
    InProcessProvider::new().tool(
        ToolInfo::new("add", "Add two integers").with_schema(schema),
        |args| {
            let a = args.get("a").and_then(Value::as_i64).unwrap_or_default();
            let b = args.get("b").and_then(Value::as_i64).unwrap_or_default();
            Ok(ToolOutput::success(json!({ "sum": a + b })))
        },
    )
}

/// Notes provider with a `read_note` tool
pub fn notes() -> InProcessProvider {
    InProcessProvider::new().tool(ToolInfo::new("read_note", "Read a note by title"), |args| {
        match args.get("title").and_then(Value::as_str) {
            Some("todo") => Ok(ToolOutput::success(json!("buy milk"))),
            Some(other) => Ok(ToolOutput::error(format!("no note named {}", other))),
            None => Ok(ToolOutput::error("")),
        }
    })
}

//! In-process provider doubles shared by unit tests

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

use crate::config::ProviderConfig;
use crate::mcp::{McpError, McpResult, ProviderConnector, ProviderSession, ToolOutput};
use crate::types::ToolInfo;

/// How a fake tool answers
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// `{"tool": name, "arguments": args}`
    Echo,
    Value(Value),
    /// Provider-reported error (`is_error = true`)
    ToolError(String),
    /// Transport-level failure
    Fail(String),
    /// Echo after a pause
    Slow(Duration),
}

#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    pub tools: Vec<ToolInfo>,
    pub replies: HashMap<String, FakeReply>,
    pub list_fails: bool,
    pub close_fails: bool,
    /// Pause before answering tools/list
    pub list_delay: Option<Duration>,
}

impl FakeProvider {
    pub fn with_tools(names: &[&str]) -> Self {
        Self {
            tools: names
                .iter()
                .map(|n| ToolInfo::new(*n, format!("{} tool", n)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn tool(mut self, tool: ToolInfo) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn reply(mut self, tool: &str, reply: FakeReply) -> Self {
        self.replies.insert(tool.to_string(), reply);
        self
    }
}

/// Everything the fakes observed
#[derive(Debug, Default)]
pub struct FakeLog {
    pub connects: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<(String, String, Map<String, Value>)>>,
    pub closes: Mutex<Vec<String>>,
}

/// Connector serving `FakeProvider`s by provider id
///
/// Ids with no registered provider fail like a missing executable.
#[derive(Default)]
pub struct FakeConnector {
    providers: HashMap<String, FakeProvider>,
    pub log: Arc<FakeLog>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, id: &str, provider: FakeProvider) -> Self {
        self.providers.insert(id.to_string(), provider);
        self
    }
}

#[async_trait]
impl ProviderConnector for FakeConnector {
    async fn connect(&self, config: &ProviderConfig) -> McpResult<Arc<dyn ProviderSession>> {
        self.log.connects.lock().push(config.id().to_string());
        let provider = self
            .providers
            .get(config.id())
            .cloned()
            .ok_or_else(|| McpError::SpawnFailed(format!("{}: No such file or directory", config.id())))?;
        Ok(Arc::new(FakeSession {
            id: config.id().to_string(),
            provider,
            log: Arc::clone(&self.log),
        }))
    }
}

pub struct FakeSession {
    id: String,
    provider: FakeProvider,
    log: Arc<FakeLog>,
}

#[async_trait]
impl ProviderSession for FakeSession {
    async fn list_tools(&self) -> McpResult<Vec<ToolInfo>> {
        if let Some(delay) = self.provider.list_delay {
            tokio::time::sleep(delay).await;
        }
        if self.provider.list_fails {
            return Err(McpError::Protocol("tools/list not supported".to_string()));
        }
        Ok(self.provider.tools.clone())
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput> {
        self.log
            .calls
            .lock()
            .push((self.id.clone(), name.to_string(), arguments.clone()));

        let echo = json!({ "tool": name, "arguments": arguments });
        match self.provider.replies.get(name).cloned().unwrap_or(FakeReply::Echo) {
            FakeReply::Echo => Ok(ToolOutput::success(echo)),
            FakeReply::Value(value) => Ok(ToolOutput::success(value)),
            FakeReply::ToolError(text) => Ok(ToolOutput::error(text)),
            FakeReply::Fail(message) => Err(McpError::ToolCallFailed(message)),
            FakeReply::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(ToolOutput::success(echo))
            }
        }
    }

    async fn close(&self) -> McpResult<()> {
        self.log.closes.lock().push(self.id.clone());
        if self.provider.close_fails {
            return Err(McpError::Closed);
        }
        Ok(())
    }
}

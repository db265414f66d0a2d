use std::sync::Arc;

use serde_json::{Map, Value};

use super::validate::validate_arguments;
use crate::logging::Logger;
use crate::registry::{ConnectionRegistry, InvocationError, InvocationResult};
use crate::types::{ToolCall, ToolResult};

/// Text used when a provider flags an error without saying anything
const UNSPECIFIED_TOOL_ERROR: &str = "tool reported an error";

/// Routes tool calls to the providers that own them
pub struct ToolInvocationRouter {
    registry: Arc<ConnectionRegistry>,
    logger: Arc<dyn Logger>,
}

impl ToolInvocationRouter {
    pub fn new(registry: Arc<ConnectionRegistry>, logger: Arc<dyn Logger>) -> Self {
        Self { registry, logger }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Invoke `name` with `arguments`; never fails, errors become data
    pub async fn invoke(&self, name: &str, arguments: Map<String, Value>) -> ToolResult {
        match self.try_invoke(name, arguments).await {
            Ok(value) => {
                self.logger.info(&format!("[ToolInvocationRouter] {} succeeded", name));
                ToolResult::success(value)
            }
            Err(e) => {
                self.logger.warn(&format!("[ToolInvocationRouter] {} failed: {}", name, e));
                ToolResult::failure(e.to_string())
            }
        }
    }

    /// Invoke a parsed tool call
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.invoke(&call.name, call.arguments.clone()).await
    }

    async fn try_invoke(&self, name: &str, arguments: Map<String, Value>) -> InvocationResult<Value> {
        let resolved = self
            .registry
            .resolve_tool(name)
            .ok_or_else(|| InvocationError::ToolNotFound(name.to_string()))?;

        validate_arguments(&resolved.tool.input_schema, &Value::Object(arguments.clone())).map_err(|reason| {
            InvocationError::InvalidArguments {
                tool: resolved.tool.name.clone(),
                reason,
            }
        })?;

        let output = self.registry.call_resolved(&resolved, arguments).await?;
        if output.is_error {
            let text = output.text.trim();
            return Err(InvocationError::Reported(if text.is_empty() {
                UNSPECIFIED_TOOL_ERROR.to_string()
            } else {
                text.to_string()
            }));
        }
        Ok(output.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::logging::NoOpLogger;
    use crate::testing::{FakeConnector, FakeLog, FakeProvider, FakeReply};
    use crate::types::{ToolInfo, TOOL_NOT_FOUND};
    use serde_json::json;

    async fn router(connector: FakeConnector) -> (ToolInvocationRouter, Arc<FakeLog>) {
        let log = Arc::clone(&connector.log);
        let registry = Arc::new(ConnectionRegistry::new(Arc::new(connector), NoOpLogger::shared()));
        registry
            .connect_all(&[ProviderConfig::stdio("fs", "Files", "mcp-fs")])
            .await;
        (ToolInvocationRouter::new(registry, NoOpLogger::shared()), log)
    }

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let (router, _) = router(FakeConnector::new()).await;
        let result = router.invoke("missing_tool", Map::new()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some(TOOL_NOT_FOUND));
        assert!(result.result.is_none());
    }

    #[tokio::test]
    async fn test_success_payload() {
        let (router, _) = router(FakeConnector::new().provider(
            "fs",
            FakeProvider::with_tools(&["stat"]).reply("stat", FakeReply::Value(json!({ "size": 12 }))),
        ))
        .await;

        let result = router.invoke("STAT", args(json!({ "path": "a.md" }))).await;
        assert!(result.success);
        assert_eq!(result.result, Some(json!({ "size": 12 })));
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_result() {
        let (router, _) = router(FakeConnector::new().provider(
            "fs",
            FakeProvider::with_tools(&["read"]).reply("read", FakeReply::Fail("broken pipe".to_string())),
        ))
        .await;

        let result = router.invoke("read", Map::new()).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Tool call failed: broken pipe"));
    }

    #[tokio::test]
    async fn test_reported_error() {
        let (router, _) = router(
            FakeConnector::new().provider(
                "fs",
                FakeProvider::with_tools(&["rm", "mv"])
                    .reply("rm", FakeReply::ToolError("permission denied".to_string()))
                    .reply("mv", FakeReply::ToolError("  ".to_string())),
            ),
        )
        .await;

        assert_eq!(router.invoke("rm", Map::new()).await.error.as_deref(), Some("permission denied"));
        assert_eq!(router.invoke("mv", Map::new()).await.error.as_deref(), Some(UNSPECIFIED_TOOL_ERROR));
    }

    #[tokio::test]
    async fn test_schema_violation_skips_call() {
        let schema = json!({
            "type": "object",
            "properties": { "path": { "type": "string" } },
            "required": ["path"]
        });
        let (router, log) = router(FakeConnector::new().provider(
            "fs",
            FakeProvider::default().tool(ToolInfo::new("read", "Read a file").with_schema(schema)),
        ))
        .await;

        let result = router.invoke("read", args(json!({ "file": "a.md" }))).await;
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("invalid arguments for read"));
        assert!(log.calls.lock().is_empty());

        let ok = router
            .execute(&ToolCall::new("c1", "read", args(json!({ "path": "a.md" }))))
            .await;
        assert!(ok.success);
        assert_eq!(log.calls.lock().len(), 1);
    }
}

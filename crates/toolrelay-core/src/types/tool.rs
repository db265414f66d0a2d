//! Tool calling types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool exposed by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name as the provider spells it
    pub name: String,
    /// Description of what the tool does
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", default = "empty_object_schema")]
    pub input_schema: Value,
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object" })
}

impl ToolInfo {
    /// Create a new tool definition with an empty object schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: empty_object_schema(),
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Case-insensitive name comparison
    ///
    /// Folds case the same way the parser does, so non-ASCII names match.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier within the batch it was parsed from
    pub id: String,
    /// Lower-cased tool name
    pub name: String,
    /// Arguments, keys in the order the model wrote them
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Arguments as a JSON object value
    pub fn arguments_value(&self) -> Value {
        Value::Object(self.arguments.clone())
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    /// Get an argument as a string
    pub fn get_arg_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get an argument as an i64
    pub fn get_arg_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }
}

/// Outcome of a tool invocation
///
/// Exactly one of `result` / `error` is meaningful, selected by `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error text used when no connected provider exposes a tool
pub const TOOL_NOT_FOUND: &str = "tool not found";

impl ToolResult {
    /// Create a successful result
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Failed result for a tool no connected provider exposes
    pub fn not_found() -> Self {
        Self::failure(TOOL_NOT_FOUND)
    }

    /// Text fed back to the model in the tool-role message
    pub fn to_message_content(&self) -> String {
        if self.success {
            let payload = self
                .result
                .as_ref()
                .map(|v| serde_json::to_string(v).unwrap_or_else(|_| v.to_string()))
                .unwrap_or_else(|| "null".to_string());
            format!("Tool executed successfully: {}", payload)
        } else {
            format!(
                "Tool execution failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

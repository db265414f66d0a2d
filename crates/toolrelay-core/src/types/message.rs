//! Conversation message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids;
use super::tool::{ToolCall, ToolResult};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// External content the user attached to a message (a note, a file, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedContext {
    /// Where the content came from
    pub path: String,
    /// Display name, used when quoting the content to the model
    pub name: String,
    pub content: String,
}

impl LinkedContext {
    pub fn new(path: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// Block appended to the user message when sending to the model
    pub fn render(&self) -> String {
        format!("\n\nReferenced content from [[{}]]:\n{}", self.name, self.content)
    }
}

/// A transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_context: Vec<LinkedContext>,
    /// Set on assistant messages that announce a tool call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    /// Set on tool messages; id of the call they answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Set on tool messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>, kind: &str) -> Self {
        Self {
            id: ids::message_id(kind),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            linked_context: Vec::new(),
            tool_call: None,
            tool_call_id: None,
            tool_result: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content, "system")
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, "user")
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, "assistant")
    }

    /// Assistant message announcing that `call` is about to run
    pub fn tool_call_announcement(call: &ToolCall) -> Self {
        let mut msg = Self::new(
            MessageRole::Assistant,
            format!("Calling tool: {}", call.name),
            "assistant-tool-call",
        );
        msg.tool_call = Some(call.clone());
        msg
    }

    /// Tool message carrying the outcome of `call`
    pub fn tool_result(call: &ToolCall, result: ToolResult) -> Self {
        let mut msg = Self::new(MessageRole::Tool, result.to_message_content(), "tool-result");
        msg.tool_call_id = Some(call.id.clone());
        msg.tool_result = Some(result);
        msg
    }

    /// Override the generated id (e.g. with the transport's response id)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach linked context
    pub fn with_linked_context(mut self, linked: Vec<LinkedContext>) -> Self {
        self.linked_context = linked;
        self
    }
}

/// Ordered, append-only sequence of messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message; existing messages are never modified
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

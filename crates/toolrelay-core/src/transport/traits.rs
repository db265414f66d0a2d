//! LLM transport contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::TransportResult;
use crate::types::{Message, MessageRole};

/// A message as sent over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: MessageRole,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role, message.content.clone())
    }
}

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub n: u32,
    pub stream: bool,
}

impl CompletionRequest {
    /// Deterministic, non-streaming request for one choice
    pub fn new(model: impl Into<String>, messages: Vec<WireMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.0,
            top_p: 1.0,
            n: 1,
            stream: false,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    /// Content of the last user message, if any
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ChoiceMessage,
}

/// Chat completion response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl CompletionResponse {
    /// Response with a single text choice
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: None,
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: Some(content.into()),
                },
            }],
        }
    }

    /// Response with no choices
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Text of the first choice; `None` when there is nothing to read
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Sends a conversation to an LLM and returns its reply
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Transport name, for logs
    fn name(&self) -> &str;

    /// Perform one completion round trip
    async fn complete(&self, request: CompletionRequest) -> TransportResult<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = CompletionRequest::new("gpt-4o", vec![WireMessage::new(MessageRole::User, "hi")]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o",
                "messages": [{ "role": "user", "content": "hi" }],
                "temperature": 0.0,
                "top_p": 1.0,
                "n": 1,
                "stream": false
            })
        );
    }

    #[test]
    fn test_response_content() {
        let response: CompletionResponse =
            serde_json::from_value(json!({ "id": "r1", "choices": [{ "message": { "content": "4" } }] })).unwrap();
        assert_eq!(response.first_content(), Some("4"));
        assert_eq!(response.id.as_deref(), Some("r1"));

        let missing: CompletionResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": null } }] })).unwrap();
        assert_eq!(missing.first_content(), None);
        assert_eq!(CompletionResponse::empty().first_content(), None);
        assert_eq!(CompletionResponse::text("").first_content(), None);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ids, Transcript};

/// One chat thread and its transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub transcript: Transcript,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_id(format!("conv-{}-{}", ids::now_millis(), ids::next_sequence()))
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            created_at: Utc::now(),
            transcript: Transcript::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(Conversation::new().id, Conversation::new().id);
    }

    #[test]
    fn test_serialized_shape() {
        let mut conversation = Conversation::with_id("c1").with_title("Math");
        conversation.transcript.push(Message::user("what's 2+2"));

        let value = serde_json::to_value(&conversation).unwrap();
        assert_eq!(value["id"], "c1");
        assert_eq!(value["title"], "Math");
        assert_eq!(value["transcript"][0]["role"], "user");

        let back: Conversation = serde_json::from_value(value).unwrap();
        assert_eq!(back, conversation);
    }
}

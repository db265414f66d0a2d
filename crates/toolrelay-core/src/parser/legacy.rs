//! Legacy `{"tool_calls": [...]}` responses

use serde_json::{Map, Value};

use super::arguments::decode_argument_value;
use super::error::ParseError;

/// One named entry of a `tool_calls` array
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegacyEntry {
    pub id: Option<String>,
    pub name: String,
    pub arguments: Result<Map<String, Value>, ParseError>,
}

/// Entries of the `tool_calls` array when `text` is a JSON document
///
/// Text that is not a JSON object, or has no `tool_calls` array, yields
/// nothing. Entries without a string `name` are left out.
pub(crate) fn legacy_entries(text: &str) -> Vec<LegacyEntry> {
    let text = text.trim();
    if !text.starts_with('{') {
        return Vec::new();
    }
    let Ok(Value::Object(root)) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    let Some(Value::Array(calls)) = root.get("tool_calls") else {
        return Vec::new();
    };

    calls
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?.trim();
            if name.is_empty() {
                return None;
            }
            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.trim().is_empty())
                .map(str::to_string);
            let arguments = decode_argument_value(entry.get("arguments").unwrap_or(&Value::Null));
            Some(LegacyEntry {
                id,
                name: name.to_string(),
                arguments,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_and_nameless_excluded() {
        let text = r#"{"tool_calls": [
            {"id": "c1", "name": "search", "arguments": {"q": "rust"}},
            {"arguments": {"q": "lost"}},
            {"name": "", "arguments": {}},
            {"name": "fetch", "arguments": "{\"url\": \"https://example.com\"}"}
        ]}"#;
        let entries = legacy_entries(text);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].id.as_deref(), Some("c1"));
        assert_eq!(entries[0].arguments.as_ref().unwrap().get("q"), Some(&json!("rust")));
        assert_eq!(entries[1].id, None);
        assert_eq!(entries[1].name, "fetch");
        assert_eq!(
            entries[1].arguments.as_ref().unwrap().get("url"),
            Some(&json!("https://example.com"))
        );
    }

    #[test]
    fn test_undecodable_arguments_kept_as_error() {
        let entries = legacy_entries(r#"{"tool_calls": [{"name": "x", "arguments": "{broken"}]}"#);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].arguments.is_err());
    }

    #[test]
    fn test_not_json_is_not_an_error() {
        assert!(legacy_entries("The answer is 4.").is_empty());
        assert!(legacy_entries("{ not json at all").is_empty());
        assert!(legacy_entries(r#"{"content": "hi"}"#).is_empty());
        assert!(legacy_entries(r#"{"tool_calls": "nope"}"#).is_empty());
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::arguments::{decode_argument_value, decode_arguments, unquote};
use super::error::ParseError;
use super::legacy::legacy_entries;
use super::scanner::{RawTag, TagScanner};
use crate::logging::{Logger, NoOpLogger};
use crate::types::{ids, ToolCall};

/// Extracts tool calls from assistant text
///
/// Tag-format calls come first, in source order, followed by any entries of
/// a legacy `tool_calls` JSON document. Names are lower-cased and every call
/// gets an id unique within the batch.
pub struct ToolCallParser {
    logger: Arc<dyn Logger>,
}

impl ToolCallParser {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Parse all tool calls in `text`; zero calls is a normal outcome
    pub fn parse(&self, text: &str) -> Vec<ToolCall> {
        let mut batch = Batch::default();

        for item in TagScanner::new(text) {
            let tag = match item {
                Ok(tag) => tag,
                Err(skipped) => {
                    self.skip(skipped.start, &skipped.error);
                    continue;
                }
            };
            match interpret(&tag) {
                Ok((name, arguments)) => batch.push(None, &name, arguments),
                Err(error) => self.skip(tag.start, &error),
            }
        }

        let from_tags = batch.calls.len();
        for entry in legacy_entries(text) {
            match entry.arguments {
                Ok(arguments) => batch.push(entry.id, &entry.name, arguments),
                Err(error) => self.logger.warn(&format!(
                    "[ToolCallParser] Dropping legacy call to {}: {}",
                    entry.name, error
                )),
            }
        }

        if !batch.calls.is_empty() {
            self.logger.debug(&format!(
                "[ToolCallParser] Extracted {} tool call(s) ({} tagged, {} legacy)",
                batch.calls.len(),
                from_tags,
                batch.calls.len() - from_tags
            ));
        }
        batch.calls
    }

    fn skip(&self, offset: usize, error: &ParseError) {
        self.logger.warn(&format!(
            "[ToolCallParser] Skipping tool call at offset {}: {}",
            offset, error
        ));
    }
}

impl Default for ToolCallParser {
    fn default() -> Self {
        Self::new(NoOpLogger::shared())
    }
}

/// Parse without logging
pub fn parse_tool_calls(text: &str) -> Vec<ToolCall> {
    ToolCallParser::default().parse(text)
}

#[derive(Default)]
struct Batch {
    calls: Vec<ToolCall>,
    ids: HashSet<String>,
}

impl Batch {
    fn push(&mut self, supplied_id: Option<String>, name: &str, arguments: Map<String, Value>) {
        let name = name.trim().to_lowercase();
        let base = supplied_id.unwrap_or_else(|| ids::tool_call_id(&name));
        let id = self.unique(base);
        self.calls.push(ToolCall::new(id, name, arguments));
    }

    fn unique(&mut self, base: String) -> String {
        if self.ids.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.ids.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Turn a tokenized tag into a name and arguments
fn interpret(tag: &RawTag<'_>) -> Result<(String, Map<String, Value>), ParseError> {
    let body = tag.body.map(str::trim).unwrap_or("");

    if let Some(name) = tag.attribute("name").map(str::trim).filter(|n| !n.is_empty()) {
        let arguments = match tag.attribute("arguments") {
            Some(raw) => decode_arguments(raw)?,
            None if body.starts_with('{') => decode_arguments(body)?,
            None => Map::new(),
        };
        return Ok((name.to_string(), arguments));
    }

    if body.starts_with('{') {
        return interpret_json_body(body);
    }
    interpret_body_fields(body)
}

/// `{"name": "x", "arguments": {...}}` as the whole body
fn interpret_json_body(body: &str) -> Result<(String, Map<String, Value>), ParseError> {
    let envelope = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => return Err(ParseError::MissingName),
    };
    let name = envelope
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ParseError::MissingName)?;
    let arguments = decode_argument_value(envelope.get("arguments").unwrap_or(&Value::Null))?;
    Ok((name.to_string(), arguments))
}

/// `name: "x"` and `arguments: {...}` lines
///
/// The arguments run from their label to the end of the body, so they may
/// span several lines.
fn interpret_body_fields(body: &str) -> Result<(String, Map<String, Value>), ParseError> {
    let (head, arguments) = match body.find("arguments:") {
        Some(at) => (&body[..at], decode_arguments(&body[at + "arguments:".len()..])?),
        None => (body, Map::new()),
    };

    let name = head
        .lines()
        .find_map(|line| line.trim().strip_prefix("name:"))
        .map(unquote)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ParseError::MissingName)?;
    Ok((name.to_string(), arguments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger};
    use serde_json::json;

    fn parser_with_log() -> (ToolCallParser, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        (ToolCallParser::new(logger.clone()), logger)
    }

    #[test]
    fn test_plain_text_has_no_calls() {
        let (parser, logger) = parser_with_log();
        assert!(parser.parse("2 + 2 = 4").is_empty());
        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_attribute_calls_in_source_order() {
        let text = r#"Let me look.
<tool_call name="read_file" arguments='{"path": "a.md"}'></tool_call>
and then
<tool_call name="search" arguments='{"q": "rust", "limit": 3}'/>"#;
        let calls = parse_tool_calls(text);

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "read_file");
        assert_eq!(calls[0].get_arg_str("path"), Some("a.md"));
        assert_eq!(calls[1].name, "search");
        assert_eq!(calls[1].get_arg_i64("limit"), Some(3));
    }

    #[test]
    fn test_inline_json_body() {
        let calls = parse_tool_calls(r#"<tool_call name="search">{"q": "tokio"}</tool_call>"#);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].get_arg_str("q"), Some("tokio"));
    }

    #[test]
    fn test_body_fields() {
        let text = "<tool_call>\nname: \"Get_Weather\"\narguments: {\"city\": \"Oslo\",\n  \"units\": \"metric\"}\n</tool_call>";
        let calls = parse_tool_calls(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].get_arg_str("units"), Some("metric"));
    }

    #[test]
    fn test_json_envelope_body() {
        let calls = parse_tool_calls(r#"<tool_call>{"name": "ls", "arguments": {"dir": "/"}}</tool_call>"#);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "ls");
        assert_eq!(calls[0].get_arg_str("dir"), Some("/"));
    }

    #[test]
    fn test_tag_text_inside_arguments() {
        let text = concat!(
            r#"<tool_call name="write_note">{"text": "use <tool_call> blocks"}</tool_call>"#,
            r#"<tool_call name=list/>"#,
        );
        let calls = parse_tool_calls(text);

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].get_arg_str("text"), Some("use <tool_call> blocks"));
        assert_eq!(calls[1].name, "list");
    }

    #[test]
    fn test_missing_arguments_is_empty_object() {
        let calls = parse_tool_calls(r#"<tool_call name="list_tools"></tool_call>"#);
        assert_eq!(calls.len(), 1);
        assert!(calls[0].arguments.is_empty());
    }

    #[test]
    fn test_names_lowercased() {
        let calls = parse_tool_calls(r#"<tool_call name=" ReadFile "/>"#);
        assert_eq!(calls[0].name, "readfile");
    }

    #[test]
    fn test_malformed_match_skipped_and_scanning_continues() {
        let (parser, logger) = parser_with_log();
        let text = r#"<tool_call name="a" arguments='{"x": 1}'/>
<tool_call name="b" arguments='{oops'/>
<tool_call name="c" arguments='{"y": 2}'/>"#;
        let calls = parser.parse(text);

        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(logger.contains(LogLevel::Warn, "invalid arguments JSON"));
    }

    #[test]
    fn test_escaped_arguments_repaired() {
        let calls = parse_tool_calls(r#"<tool_call name="write" arguments="{\"text\": \"line\"}"></tool_call>"#);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].get_arg_str("text"), Some("line"));
    }

    #[test]
    fn test_broken_tags_skipped_with_warning() {
        let (parser, logger) = parser_with_log();
        let text = r#"<tool_call>no name here</tool_call>
<tool_call name="open">never closed
<tool_call name="ok"/>"#;
        let calls = parser.parse(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "ok");
        assert!(logger.contains(LogLevel::Warn, "tool call has no name"));
        assert!(logger.contains(LogLevel::Warn, "missing </tool_call>"));
    }

    #[test]
    fn test_same_tool_twice_gets_distinct_ids() {
        let calls = parse_tool_calls(r#"<tool_call name="ping"/><tool_call name="ping"/>"#);
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[0].id, calls[1].id);
        assert!(calls[0].id.starts_with("tool-"));
        assert!(calls[0].id.contains("-ping-"));
    }

    #[test]
    fn test_legacy_fallback() {
        let (parser, logger) = parser_with_log();
        let text = r#"{"tool_calls": [
            {"name": "Search", "arguments": "{\"q\": \"rust\"}"},
            {"arguments": {"orphan": true}},
            {"name": "broken", "arguments": "{nope"}
        ]}"#;
        let calls = parser.parse(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "search");
        assert_eq!(calls[0].arguments_value(), json!({"q": "rust"}));
        assert!(logger.contains(LogLevel::Warn, "Dropping legacy call to broken"));
        assert!(!logger.contains(LogLevel::Warn, "orphan"));
    }

    #[test]
    fn test_supplied_ids_kept_and_deduplicated() {
        let text = r#"{"tool_calls": [
            {"id": "call_1", "name": "a", "arguments": {}},
            {"id": "call_1", "name": "b", "arguments": {}}
        ]}"#;
        let calls = parse_tool_calls(text);

        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[1].id, "call_1-2");
    }
}

//! Outbound message assembly

use crate::transport::WireMessage;
use crate::types::{LinkedContext, MessageRole, ToolInfo, Transcript};

/// Instructions teaching the model the call format the parser reads
pub const TOOL_CALL_INSTRUCTIONS: &str = "To use a tool, reply with a block in exactly this format:
<tool_call>
name: \"tool name\"
arguments: {\"parameter\": \"value\"}
</tool_call>
Arguments must be a JSON object. You may request several tools in one reply.";

/// System prompt with the tool list and call format appended
///
/// Without tools the base prompt is returned unchanged.
pub fn system_prompt(base: &str, tools: &[ToolInfo]) -> String {
    if tools.is_empty() {
        return base.to_string();
    }

    let listing = tools
        .iter()
        .map(|t| format!("- {}: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = base.to_string();
    if !prompt.is_empty() {
        prompt.push_str("\n\n");
    }
    prompt.push_str("Available tools:\n");
    prompt.push_str(&listing);
    prompt.push_str("\n\n");
    prompt.push_str(TOOL_CALL_INSTRUCTIONS);
    prompt
}

/// System prompt, then the transcript, with `linked` merged into the most
/// recent user message
///
/// Only the outbound copy is changed; the transcript is left as it is.
pub fn build_messages(system: &str, transcript: &Transcript, linked: &[LinkedContext]) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    if !system.is_empty() {
        messages.push(WireMessage::new(MessageRole::System, system));
    }
    messages.extend(transcript.iter().map(WireMessage::from));

    if !linked.is_empty() {
        if let Some(last_user) = messages.iter_mut().rev().find(|m| m.role == MessageRole::User) {
            let quoted = linked.iter().map(LinkedContext::render).collect::<Vec<_>>().join("\n\n");
            last_user.content.push_str(&quoted);
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn test_prompt_without_tools() {
        assert_eq!(system_prompt("Be brief.", &[]), "Be brief.");
    }

    #[test]
    fn test_prompt_lists_tools() {
        let tools = vec![
            ToolInfo::new("read_file", "Read a file"),
            ToolInfo::new("search", "Search the web"),
        ];
        let prompt = system_prompt("Be brief.", &tools);

        assert!(prompt.starts_with("Be brief.\n\nAvailable tools:\n- read_file: Read a file\n- search: Search the web"));
        assert!(prompt.ends_with(TOOL_CALL_INSTRUCTIONS));
    }

    #[test]
    fn test_instructions_parse_as_a_call() {
        let calls = crate::parser::parse_tool_calls(TOOL_CALL_INSTRUCTIONS);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "tool name");
    }

    #[test]
    fn test_linked_context_merged_into_last_user_message() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("first"));
        transcript.push(Message::assistant("reply"));
        transcript.push(Message::user("summarize"));

        let linked = vec![
            LinkedContext::new("notes/a.md", "a", "alpha"),
            LinkedContext::new("notes/b.md", "b", "beta"),
        ];
        let messages = build_messages("sys", &transcript, &linked);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].content, "first");
        assert_eq!(
            messages[3].content,
            "summarize\n\nReferenced content from [[a]]:\nalpha\n\n\n\nReferenced content from [[b]]:\nbeta"
        );
        assert_eq!(transcript.messages()[2].content, "summarize");
    }

    #[test]
    fn test_empty_system_prompt_omitted() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi"));
        let messages = build_messages("", &transcript, &[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::User);
    }
}

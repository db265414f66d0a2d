//! Identifier generation for messages and tool calls

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Process-wide sequence; never repeats within a process lifetime
static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Next value of the process-wide sequence
pub fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Current time as unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a tool call id: `tool-<millis>-<name>-<seq>`
///
/// Timestamp and name alone collide when a model calls the same tool twice
/// in one response, so the sequence number is always appended.
pub fn tool_call_id(name: &str) -> String {
    format!("tool-{}-{}-{}", now_millis(), sanitize(name), next_sequence())
}

/// Generate a message id: `<millis>-<seq>-<kind>`
pub fn message_id(kind: &str) -> String {
    format!("{}-{}-{}", now_millis(), next_sequence(), kind)
}

/// Keep ids free of whitespace and quoting characters
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

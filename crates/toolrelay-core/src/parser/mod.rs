//! Tool-call extraction from assistant text
//!
//! Two formats are understood. The tag format, in any of these shapes:
//!
//! ```text
//! <tool_call name="read_file" arguments='{"path": "a.md"}'></tool_call>
//! <tool_call name="read_file" arguments='{"path": "a.md"}'/>
//! <tool_call name="read_file">{"path": "a.md"}</tool_call>
//! <tool_call>
//! name: "read_file"
//! arguments: {"path": "a.md"}
//! </tool_call>
//! ```
//!
//! and, as a supplement, a response that is itself a JSON document with a
//! `tool_calls` array of `{id?, name, arguments}` entries.

mod arguments;
mod error;
mod extract;
mod legacy;
mod scanner;

pub use error::ParseError;
pub use extract::{parse_tool_calls, ToolCallParser};

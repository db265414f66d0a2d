//! Core types shared across the relay
//!
//! Messages and transcripts, tool calls and results, tool descriptions and
//! the cancellation token used by orchestration runs.

mod message;
mod tool;
mod cancellation;
pub mod ids;

pub use message::{Message, MessageRole, LinkedContext, Transcript};
pub use tool::{ToolInfo, ToolCall, ToolResult, TOOL_NOT_FOUND};
pub use cancellation::CancellationToken;

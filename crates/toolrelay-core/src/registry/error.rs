use thiserror::Error;

use crate::mcp::McpError;
use crate::types::TOOL_NOT_FOUND;

/// Failure of a single tool invocation
///
/// Never aborts a run; the router turns it into a failed `ToolResult`.
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("{}", TOOL_NOT_FOUND)]
    ToolNotFound(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("{source}")]
    Provider {
        provider: String,
        #[source]
        source: McpError,
    },

    #[error("{0}")]
    Reported(String),
}

pub type InvocationResult<T> = Result<T, InvocationError>;

//! Tool invocation routing
//!
//! Resolves a tool to its provider, checks the arguments against the
//! provider's schema and performs the call. Every outcome, including
//! failures, comes back as a `ToolResult`.

mod invoke;
mod validate;

pub use invoke::ToolInvocationRouter;
pub use validate::validate_arguments;

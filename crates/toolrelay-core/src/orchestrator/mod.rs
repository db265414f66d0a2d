//! The tool-calling loop
//!
//! ```text
//! AwaitingCompletion -> ParsingResponse -> Finalizing -> Finalized
//!        ^                    |
//!        |                    v
//!        +------------ DispatchingTools
//!
//! any state -> Aborted   (iteration cap, cancellation)
//! ```

mod error;
mod prompt;
mod run;
mod state;

pub use error::{OrchestratorError, OrchestratorResult};
pub use prompt::{build_messages, system_prompt, TOOL_CALL_INSTRUCTIONS};
pub use run::{OrchestratorConfig, ToolCallOrchestrator, DEFAULT_MAX_ITERATIONS};
pub use state::{RunOutcome, RunState, StopReason};

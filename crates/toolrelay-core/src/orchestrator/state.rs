use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Where a run is in its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    AwaitingCompletion,
    ParsingResponse,
    DispatchingTools,
    Finalizing,
    Finalized,
    Aborted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Finalized | RunState::Aborted)
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model answered without requesting tools
    FinalAnswer,
    /// The transport returned no content
    EmptyResponse,
    /// The round-trip cap was reached while the model still wanted tools
    IterationLimit,
    Cancelled,
}

/// Result of one orchestrated turn
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// `Finalized` or `Aborted`
    pub state: RunState,
    pub reason: StopReason,
    /// The assistant message appended at the end, if any
    pub final_message: Option<Message>,
    /// Content of the last model reply seen
    pub last_content: Option<String>,
    /// Transport round trips made
    pub rounds: usize,
    /// Tool calls dispatched across all rounds
    pub tool_calls: usize,
}

impl RunOutcome {
    pub fn is_finalized(&self) -> bool {
        self.state == RunState::Finalized
    }

    /// Final answer text, falling back to the last content seen
    pub fn text(&self) -> Option<&str> {
        self.final_message
            .as_ref()
            .map(|m| m.content.as_str())
            .or(self.last_content.as_deref())
    }
}

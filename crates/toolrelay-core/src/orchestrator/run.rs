use std::future::Future;
use std::sync::Arc;

use super::error::OrchestratorResult;
use super::prompt::{build_messages, system_prompt};
use super::state::{RunOutcome, RunState, StopReason};
use crate::config::{Profile, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
use crate::logging::Logger;
use crate::parser::ToolCallParser;
use crate::router::ToolInvocationRouter;
use crate::transport::{ChatTransport, CompletionRequest};
use crate::types::{CancellationToken, LinkedContext, Message, ToolInfo, Transcript};

/// Default cap on model round trips per turn
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Per-turn settings
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Maximum transport round trips in one run
    pub max_iterations: usize,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub system_prompt: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            top_p: 1.0,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Model and system prompt taken from `profile`
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            model: profile.selected_model.clone(),
            system_prompt: profile.system_prompt.clone(),
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Drives one user turn: model, tools, model again, until an answer
///
/// The run is the only writer of the transcript while it lasts.
pub struct ToolCallOrchestrator {
    transport: Arc<dyn ChatTransport>,
    router: Arc<ToolInvocationRouter>,
    parser: ToolCallParser,
    config: OrchestratorConfig,
    cancel: Option<CancellationToken>,
    logger: Arc<dyn Logger>,
}

impl ToolCallOrchestrator {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        router: Arc<ToolInvocationRouter>,
        config: OrchestratorConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            transport,
            router,
            parser: ToolCallParser::new(Arc::clone(&logger)),
            config,
            cancel: None,
            logger,
        }
    }

    /// Stop the run when `token` is cancelled
    ///
    /// Checked before each round and each tool call, and raced against the
    /// transport. A tool call that has started always completes.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run one turn over `transcript`
    ///
    /// `linked` is quoted into the latest user message of every outbound
    /// request; `tools` are advertised in the system prompt.
    pub async fn run(
        &self,
        transcript: &mut Transcript,
        linked: &[LinkedContext],
        tools: &[ToolInfo],
    ) -> OrchestratorResult<RunOutcome> {
        let system = system_prompt(&self.config.system_prompt, tools);
        let mut run = Run::new();

        loop {
            if self.is_cancelled() {
                return Ok(run.abort(StopReason::Cancelled, &*self.logger));
            }
            if run.rounds >= self.config.max_iterations {
                self.logger.warn(&format!(
                    "[ToolCallOrchestrator] Stopping after {} rounds with tools still requested",
                    run.rounds
                ));
                return Ok(run.abort(StopReason::IterationLimit, &*self.logger));
            }

            run.rounds += 1;
            let request = CompletionRequest::new(&self.config.model, build_messages(&system, transcript, linked))
                .with_sampling(self.config.temperature, self.config.top_p);
            self.logger.debug(&format!(
                "[ToolCallOrchestrator] Round {} via {}: {} messages",
                run.rounds,
                self.transport.name(),
                request.messages.len()
            ));

            let Some(response) = self.unless_cancelled(self.transport.complete(request)).await else {
                return Ok(run.abort(StopReason::Cancelled, &*self.logger));
            };
            let response = response.map_err(|e| {
                self.logger.error(&format!("[ToolCallOrchestrator] Transport failed: {}", e));
                e
            })?;

            run.enter(RunState::ParsingResponse, &*self.logger);
            let Some(content) = response.first_content() else {
                self.logger.info("[ToolCallOrchestrator] Model returned no content");
                run.enter(RunState::Finalized, &*self.logger);
                return Ok(run.finish(StopReason::EmptyResponse, None));
            };
            run.last_content = Some(content.to_string());

            let calls = self.parser.parse(content);
            if calls.is_empty() {
                run.enter(RunState::Finalizing, &*self.logger);
                let mut answer = Message::assistant(content);
                if let Some(id) = response.id.as_deref().filter(|id| !id.is_empty()) {
                    answer = answer.with_id(id);
                }
                transcript.push(answer.clone());
                run.enter(RunState::Finalized, &*self.logger);
                return Ok(run.finish(StopReason::FinalAnswer, Some(answer)));
            }

            run.enter(RunState::DispatchingTools, &*self.logger);
            for call in calls {
                if self.is_cancelled() {
                    return Ok(run.abort(StopReason::Cancelled, &*self.logger));
                }
                self.logger.info(&format!("[ToolCallOrchestrator] Calling {} ({})", call.name, call.id));
                transcript.push(Message::tool_call_announcement(&call));
                let result = self.router.execute(&call).await;
                transcript.push(Message::tool_result(&call, result));
                run.tool_calls += 1;
            }
            run.enter(RunState::AwaitingCompletion, &*self.logger);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    async fn unless_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        match &self.cancel {
            Some(token) => token.run_until_cancelled(fut).await,
            None => Some(fut.await),
        }
    }
}

/// Bookkeeping for one run
struct Run {
    state: RunState,
    rounds: usize,
    tool_calls: usize,
    last_content: Option<String>,
}

impl Run {
    fn new() -> Self {
        Self {
            state: RunState::AwaitingCompletion,
            rounds: 0,
            tool_calls: 0,
            last_content: None,
        }
    }

    fn enter(&mut self, next: RunState, logger: &dyn Logger) {
        logger.debug(&format!("[ToolCallOrchestrator] {:?} -> {:?}", self.state, next));
        self.state = next;
    }

    fn abort(mut self, reason: StopReason, logger: &dyn Logger) -> RunOutcome {
        self.enter(RunState::Aborted, logger);
        self.finish(reason, None)
    }

    fn finish(self, reason: StopReason, final_message: Option<Message>) -> RunOutcome {
        RunOutcome {
            state: self.state,
            reason,
            final_message,
            last_content: self.last_content,
            rounds: self.rounds,
            tool_calls: self.tool_calls,
        }
    }
}

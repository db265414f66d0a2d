//! Scripted transport for testing
//!
//! Deterministic replies without network access. Every request is recorded
//! so tests can inspect exactly what would have been sent.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{TransportError, TransportResult};
use super::traits::{ChatTransport, CompletionRequest, CompletionResponse};
use crate::logging::{Logger, NoOpLogger};

/// One scripted round trip
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Reply(CompletionResponse),
    Fail { status: u16, message: String },
}

/// Reply mode
#[derive(Debug, Clone)]
pub enum ScriptMode {
    /// Echo back the last user message
    Echo,
    /// Same reply every time
    Fixed(String),
    /// Steps in order; once exhausted, empty responses
    Sequence(VecDeque<ScriptStep>),
    /// No content at all
    Empty,
    /// Fail every request
    Error { status: u16, message: String },
}

pub struct ScriptedTransport {
    mode: Mutex<ScriptMode>,
    requests: Mutex<Vec<CompletionRequest>>,
    logger: Arc<dyn Logger>,
}

impl ScriptedTransport {
    pub fn new(mode: ScriptMode) -> Self {
        Self {
            mode: Mutex::new(mode),
            requests: Mutex::new(Vec::new()),
            logger: NoOpLogger::shared(),
        }
    }

    pub fn echo() -> Self {
        Self::new(ScriptMode::Echo)
    }

    pub fn fixed(reply: impl Into<String>) -> Self {
        Self::new(ScriptMode::Fixed(reply.into()))
    }

    /// Text replies in order
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::responses(replies.into_iter().map(CompletionResponse::text))
    }

    /// Full responses in order
    pub fn responses(responses: impl IntoIterator<Item = CompletionResponse>) -> Self {
        Self::steps(responses.into_iter().map(ScriptStep::Reply))
    }

    /// Replies and failures in order
    pub fn steps(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self::new(ScriptMode::Sequence(steps.into_iter().collect()))
    }

    pub fn empty() -> Self {
        Self::new(ScriptMode::Empty)
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::new(ScriptMode::Error {
            status,
            message: message.into(),
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> TransportResult<CompletionResponse> {
        self.logger.debug(&format!(
            "[ScriptedTransport] Request {} with {} messages",
            self.request_count() + 1,
            request.messages.len()
        ));

        let reply = match &mut *self.mode.lock() {
            ScriptMode::Echo => Ok(CompletionResponse::text(
                request.last_user_content().unwrap_or_default(),
            )),
            ScriptMode::Fixed(text) => Ok(CompletionResponse::text(text.clone())),
            ScriptMode::Sequence(queue) => match queue.pop_front() {
                Some(ScriptStep::Reply(response)) => Ok(response),
                Some(ScriptStep::Fail { status, message }) => Err(TransportError::from_status(status, message)),
                None => Ok(CompletionResponse::empty()),
            },
            ScriptMode::Empty => Ok(CompletionResponse::empty()),
            ScriptMode::Error { status, message } => Err(TransportError::from_status(*status, message.clone())),
        };

        self.requests.lock().push(request);
        reply
    }
}

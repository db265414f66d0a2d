//! toolrelay core
//!
//! Lets a chat model use external tools. The model is taught a plain-text
//! call format; its replies are scanned for tool calls, each call is routed
//! to the tool provider that owns it, and the results are fed back until
//! the model answers in prose or the round-trip cap is reached.
//!
//! Tool providers speak the Model Context Protocol, either as child
//! processes over stdio or as network services.
//!
//! ## Flow
//!
//! ```text
//! ChatService -> ToolCallOrchestrator -> ChatTransport (LLM)
//!                        |
//!                  ToolCallParser
//!                        |
//!               ToolInvocationRouter -> ConnectionRegistry -> provider
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolrelay_core::{ChatService, ConnectionRegistry, Conversation, Logger, McpConnector, TracingLogger};
//! use toolrelay_core::config::{ConfigProvider, FileConfigProvider};
//! use toolrelay_core::transport::HttpChatTransport;
//!
//! let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());
//! let settings = FileConfigProvider::user().load().await?;
//!
//! let registry = Arc::new(ConnectionRegistry::new(Arc::new(McpConnector::new(logger.clone())), logger.clone()));
//! let transport = Arc::new(HttpChatTransport::new("https://api.example.com/v1", logger.clone()).with_token(token));
//! let service = ChatService::new(transport, registry, settings.active_profile(), logger);
//! service.activate(&settings).await;
//!
//! let mut conversation = Conversation::new();
//! let outcome = service.send(&mut conversation, "what's 2+2", vec![]).await?;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod mcp;
pub mod parser;
pub mod registry;
pub mod router;
pub mod transport;
pub mod orchestrator;
pub mod chat;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use types::{
    CancellationToken, LinkedContext, Message, MessageRole, ToolCall, ToolInfo, ToolResult, Transcript,
};

pub use logging::{Logger, MemoryLogger, NoOpLogger, TracingLogger};

pub use config::{ConfigProvider, FileConfigProvider, MemoryConfigProvider, Profile, ProviderConfig, Settings};

pub use mcp::{McpConnector, McpError, ProviderConnector, ProviderSession};

pub use parser::{parse_tool_calls, ToolCallParser};

pub use registry::{ConnectionInfo, ConnectionRegistry, ConnectionStatus, InvocationError};

pub use router::ToolInvocationRouter;

pub use transport::{ChatTransport, HttpChatTransport, ScriptedTransport, TransportError};

pub use orchestrator::{
    OrchestratorConfig, OrchestratorError, RunOutcome, RunState, StopReason, ToolCallOrchestrator,
};

pub use chat::{ChatService, Conversation};

//! LLM transports
//!
//! `ChatTransport` is the one seam between the relay and a language model:
//! an ordered message list goes out, a list of choices comes back.
//!
//! - `HttpChatTransport`: OpenAI-compatible `/chat/completions` over reqwest
//! - `ScriptedTransport`: deterministic replies for tests

mod traits;
mod error;
mod http;
mod scripted;

pub use traits::{ChatTransport, Choice, ChoiceMessage, CompletionRequest, CompletionResponse, WireMessage};
pub use error::{TransportError, TransportResult};
pub use http::HttpChatTransport;
pub use scripted::{ScriptMode, ScriptStep, ScriptedTransport};

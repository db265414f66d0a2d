//! Conversations and the host-facing chat service
//!
//! ```rust,ignore
//! use toolrelay_core::chat::{ChatService, Conversation};
//!
//! let service = ChatService::new(transport, registry, profile, logger);
//! service.activate(&settings).await;
//!
//! let mut conversation = Conversation::new();
//! let outcome = service.send(&mut conversation, "what's in notes/todo.md?", vec![]).await?;
//! ```

mod conversation;
mod service;

pub use conversation::Conversation;
pub use service::ChatService;

//! Provider connection lifecycle and tool routing
//!
//! ```text
//! Disconnected -> Connecting -> Connected
//!                     |
//!                     +-------> Error   (connect again to retry)
//! ```

mod connection;
mod connection_registry;
mod error;

pub use connection::{ConnectionInfo, ConnectionStatus, ConnectionSummary, ResolvedTool};
pub use connection_registry::{ConnectionRegistry, DEFAULT_REQUEST_TIMEOUT};
pub use error::{InvocationError, InvocationResult};

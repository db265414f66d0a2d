//! Tool-provider sessions
//!
//! `ProviderSession` / `ProviderConnector` are the seams the registry uses.
//! The default implementation speaks the Model Context Protocol through the
//! official rmcp SDK.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolrelay_core::mcp::{McpConnector, ProviderConnector};
//!
//! let connector = McpConnector::new(logger);
//! let session = connector.connect(&config).await?;
//!
//! let tools = session.list_tools().await?;
//! let output = session.call_tool("read_file", args).await?;
//! session.close().await?;
//! ```

mod session;
mod launch;
mod client;
mod connector;

pub use session::{McpError, McpResult, ProviderSession, ProviderConnector, ToolOutput};
pub use launch::{LaunchSpec, Platform};
pub use client::McpClient;
pub use connector::{McpConnector, UNIX_SCHEME};

//! MCP client using the official rmcp SDK
//!
//! One `McpClient` per connected provider. Stdio providers run as child
//! processes; network providers are reached over Streamable HTTP or a Unix
//! socket.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Implementation, RawContent, Tool},
    service::{Peer, RunningService},
    transport::TokioChildProcess,
    RoleClient,
};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

#[cfg(unix)]
use std::path::Path;
#[cfg(unix)]
use tokio::net::UnixStream;

use super::launch::LaunchSpec;
use super::session::{McpError, McpResult, ProviderSession, ToolOutput};
use crate::logging::Logger;
use crate::types::ToolInfo;

type Service = RunningService<RoleClient, ClientInfo>;

/// MCP client for a single tool provider
pub struct McpClient {
    /// Provider id, for log lines
    provider_id: String,
    /// Request handle; cheap to clone, usable concurrently
    peer: Peer<RoleClient>,
    /// The running service, taken on close
    service: Mutex<Option<Service>>,
    logger: Arc<dyn Logger>,
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "toolrelay".to_string(),
            title: Some("toolrelay".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

impl McpClient {
    fn from_service(provider_id: &str, service: Service, logger: Arc<dyn Logger>) -> Self {
        let peer = service.peer().clone();
        Self {
            provider_id: provider_id.to_string(),
            peer,
            service: Mutex::new(Some(service)),
            logger,
        }
    }

    /// Spawn a provider process and initialize over its stdio
    pub async fn connect_stdio(
        provider_id: &str,
        launch: &LaunchSpec,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        logger.info(&format!("[McpClient:{}] Spawning: {}", provider_id, launch));

        let transport = TokioChildProcess::new(launch.to_command())
            .map_err(|e| McpError::SpawnFailed(format!("{}: {}", launch.program, e)))?;

        let service = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info(&format!("[McpClient:{}] Connected and initialized", provider_id));
        Ok(Self::from_service(provider_id, service, logger))
    }

    /// Connect to a provider over HTTP (Streamable HTTP transport)
    ///
    /// `credentials`, when present, are sent as a bearer token.
    pub async fn connect_http(
        provider_id: &str,
        url: &str,
        credentials: Option<&str>,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        use rmcp::transport::StreamableHttpClientTransport;
        use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;

        logger.info(&format!("[McpClient:{}] Connecting to HTTP: {}", provider_id, url));

        let mut config = StreamableHttpClientTransportConfig::with_uri(url.to_string());
        if let Some(token) = credentials {
            config = config.auth_header(token.to_string());
        }
        let transport = StreamableHttpClientTransport::from_config(config);

        let service = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info(&format!("[McpClient:{}] Connected and initialized", provider_id));
        Ok(Self::from_service(provider_id, service, logger))
    }

    /// Connect to a provider listening on a Unix socket
    #[cfg(unix)]
    pub async fn connect_unix<P: AsRef<Path>>(
        provider_id: &str,
        socket_path: P,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        let path = socket_path.as_ref();
        logger.info(&format!("[McpClient:{}] Connecting to Unix socket: {:?}", provider_id, path));

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        let service = client_info()
            .serve(stream)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info(&format!("[McpClient:{}] Connected and initialized", provider_id));
        Ok(Self::from_service(provider_id, service, logger))
    }

    /// Provider id this client belongs to
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Server name and version reported during the handshake
    pub fn server_info(&self) -> Option<String> {
        self.peer
            .peer_info()
            .map(|info| format!("{} {}", info.server_info.name, info.server_info.version))
    }
}

impl From<Tool> for ToolInfo {
    fn from(tool: Tool) -> Self {
        let schema = serde_json::to_value(tool.input_schema.as_ref())
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
        ToolInfo::new(
            tool.name.to_string(),
            tool.description.map(|s| s.to_string()).unwrap_or_default(),
        )
        .with_schema(schema)
    }
}

/// Flatten an MCP call result into a `ToolOutput`
fn to_output(result: CallToolResult) -> ToolOutput {
    // Content is Annotated<RawContent>, .raw holds the payload
    let text = result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    let content = match result.structured_content {
        Some(structured) => structured,
        None => serde_json::to_value(&result.content).unwrap_or(Value::Null),
    };

    ToolOutput {
        content,
        text,
        is_error: result.is_error.unwrap_or(false),
    }
}

#[async_trait]
impl ProviderSession for McpClient {
    async fn list_tools(&self) -> McpResult<Vec<ToolInfo>> {
        let tools = self
            .peer
            .list_all_tools()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger.info(&format!(
            "[McpClient:{}] Listed {} tools",
            self.provider_id,
            tools.len()
        ));

        Ok(tools.into_iter().map(ToolInfo::from).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput> {
        self.logger.debug(&format!("[McpClient:{}] Calling tool: {}", self.provider_id, name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: Some(arguments),
            task: None,
        };

        let result = self
            .peer
            .call_tool(params)
            .await
            .map_err(|e| McpError::ToolCallFailed(e.to_string()))?;

        Ok(to_output(result))
    }

    async fn close(&self) -> McpResult<()> {
        let Some(service) = self.service.lock().await.take() else {
            return Ok(());
        };
        self.logger.info(&format!("[McpClient:{}] Closing connection", self.provider_id));
        service
            .cancel()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;
        Ok(())
    }
}

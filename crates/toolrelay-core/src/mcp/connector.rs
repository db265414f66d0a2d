//! Default connector: opens MCP sessions for provider configs

use std::sync::Arc;

use async_trait::async_trait;

use super::client::McpClient;
use super::launch::LaunchSpec;
use super::session::{McpError, McpResult, ProviderConnector, ProviderSession};
use crate::config::ProviderConfig;
use crate::logging::Logger;

/// URL scheme selecting the Unix socket transport for network providers
pub const UNIX_SCHEME: &str = "unix://";

/// Connects providers over MCP
pub struct McpConnector {
    logger: Arc<dyn Logger>,
}

impl McpConnector {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl ProviderConnector for McpConnector {
    async fn connect(&self, config: &ProviderConfig) -> McpResult<Arc<dyn ProviderSession>> {
        let client = match config {
            ProviderConfig::Stdio(stdio) => {
                let launch = LaunchSpec::resolve(stdio);
                if launch.is_interpreted(stdio) {
                    self.logger.debug(&format!(
                        "[McpConnector] {} is a script, launching through {}",
                        stdio.command, launch.program
                    ));
                }
                McpClient::connect_stdio(&stdio.id, &launch, Arc::clone(&self.logger)).await?
            }
            ProviderConfig::Network(network) => match network.url.strip_prefix(UNIX_SCHEME) {
                #[cfg(unix)]
                Some(path) => McpClient::connect_unix(&network.id, path, Arc::clone(&self.logger)).await?,
                #[cfg(not(unix))]
                Some(_) => {
                    return Err(McpError::Unsupported(format!(
                        "{}: unix sockets are not available on this platform",
                        network.id
                    )))
                }
                None if network.url.starts_with("http://") || network.url.starts_with("https://") => {
                    McpClient::connect_http(
                        &network.id,
                        &network.url,
                        network.credentials.as_deref(),
                        Arc::clone(&self.logger),
                    )
                    .await?
                }
                None => {
                    return Err(McpError::Unsupported(format!(
                        "{}: unrecognized url {}",
                        network.id, network.url
                    )))
                }
            },
        };
        Ok(Arc::new(client))
    }
}

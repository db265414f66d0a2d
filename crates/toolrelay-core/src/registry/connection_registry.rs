use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::connection::{ConnectionInfo, ConnectionStatus, ConnectionSummary, ResolvedTool};
use super::error::{InvocationError, InvocationResult};
use crate::config::ProviderConfig;
use crate::logging::Logger;
use crate::{log_debug, log_info, log_warn};
use crate::mcp::{McpError, McpResult, ProviderConnector, ProviderSession, ToolOutput};
use crate::types::ToolInfo;

/// Upper bound on each provider request: connect, tools/list, tools/call, close
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One registry entry: the public record plus the live session
struct Slot {
    info: ConnectionInfo,
    session: Option<Arc<dyn ProviderSession>>,
}

/// The set of active tool-provider connections
///
/// Entries keep the order in which their connect attempts started, which is
/// also the order tool names are resolved in. Share it with `Arc`.
///
/// Invocations hold the lifecycle lock shared for the whole provider call;
/// `connect`, `disconnect`, `shutdown` and `switch_providers` take it
/// exclusively, so a session is never closed under a running call. Every
/// provider request is bounded by the request timeout, which also bounds how
/// long a mutation can wait behind a call.
pub struct ConnectionRegistry {
    connector: Arc<dyn ProviderConnector>,
    slots: RwLock<Vec<Slot>>,
    lifecycle: tokio::sync::RwLock<()>,
    request_timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl ConnectionRegistry {
    pub fn new(connector: Arc<dyn ProviderConnector>, logger: Arc<dyn Logger>) -> Self {
        Self {
            connector,
            slots: RwLock::new(Vec::new()),
            lifecycle: tokio::sync::RwLock::new(()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            logger,
        }
    }

    /// Override the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Connect one provider
    ///
    /// Returns the resulting record. An id that is already connecting or
    /// connected is left untouched; one in `Error` is attempted again.
    pub async fn connect(&self, config: &ProviderConfig) -> ConnectionInfo {
        let _guard = self.lifecycle.write().await;
        self.connect_locked(std::slice::from_ref(config)).await;
        self.snapshot(config)
    }

    /// Connect every config concurrently and wait for all of them
    ///
    /// One provider failing never affects the others. The report has one
    /// record per config, in config order.
    pub async fn connect_all(&self, configs: &[ProviderConfig]) -> Vec<ConnectionInfo> {
        let _guard = self.lifecycle.write().await;
        self.connect_locked(configs).await;
        configs.iter().map(|c| self.snapshot(c)).collect()
    }

    /// Close and remove one connection
    ///
    /// Returns whether an entry existed. Close errors are logged; the entry is
    /// removed either way.
    pub async fn disconnect(&self, id: &str) -> bool {
        let _guard = self.lifecycle.write().await;
        let removed = {
            let mut slots = self.slots.write();
            slots
                .iter()
                .position(|s| s.info.id == id)
                .map(|index| slots.remove(index))
        };
        match removed {
            Some(slot) => {
                self.close_slot(slot).await;
                true
            }
            None => false,
        }
    }

    /// Close and remove every connection
    pub async fn shutdown(&self) {
        let _guard = self.lifecycle.write().await;
        self.shutdown_locked().await;
    }

    /// Replace the whole provider set in one critical section
    ///
    /// Calls already running finish first; no call can observe the registry
    /// half torn down.
    pub async fn switch_providers(&self, configs: &[ProviderConfig]) -> Vec<ConnectionInfo> {
        let _guard = self.lifecycle.write().await;
        self.logger.info(&format!(
            "[ConnectionRegistry] Switching to {} provider(s)",
            configs.len()
        ));
        self.shutdown_locked().await;
        self.connect_locked(configs).await;
        configs.iter().map(|c| self.snapshot(c)).collect()
    }

    /// Find the connected provider owning `name`
    ///
    /// Case-insensitive; connections are scanned in registry order and the
    /// first match wins.
    pub fn resolve_tool(&self, name: &str) -> Option<ResolvedTool> {
        self.route(name).map(|(resolved, _)| resolved)
    }

    /// Invoke a tool on its owning provider
    ///
    /// The provider receives the tool name as it advertised it.
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> InvocationResult<ToolOutput> {
        let _guard = self.lifecycle.read().await;
        let (resolved, session) = self
            .route(name)
            .ok_or_else(|| InvocationError::ToolNotFound(name.to_string()))?;
        self.dispatch(&resolved, session, arguments).await
    }

    /// Invoke a tool previously returned by `resolve_tool`
    ///
    /// The call only goes out if the same provider still offers the same tool
    /// definition; otherwise it fails with `ToolNotFound`.
    pub async fn call_resolved(
        &self,
        resolved: &ResolvedTool,
        arguments: Map<String, Value>,
    ) -> InvocationResult<ToolOutput> {
        let _guard = self.lifecycle.read().await;
        let session = self
            .session_for(resolved)
            .ok_or_else(|| InvocationError::ToolNotFound(resolved.tool.name.clone()))?;
        self.dispatch(resolved, session, arguments).await
    }

    /// Tools of all connected providers, in registry order
    pub fn available_tools(&self) -> Vec<ToolInfo> {
        self.slots
            .read()
            .iter()
            .flat_map(|s| s.info.usable_tools().iter().cloned())
            .collect()
    }

    /// Status line per provider
    pub fn connection_status(&self) -> Vec<ConnectionSummary> {
        self.slots.read().iter().map(|s| s.info.summary()).collect()
    }

    /// Snapshots of every connection record
    pub fn connections(&self) -> Vec<ConnectionInfo> {
        self.slots.read().iter().map(|s| s.info.clone()).collect()
    }

    /// Snapshot of one connection record
    pub fn connection(&self, id: &str) -> Option<ConnectionInfo> {
        self.slots
            .read()
            .iter()
            .find(|s| s.info.id == id)
            .map(|s| s.info.clone())
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    fn route(&self, name: &str) -> Option<(ResolvedTool, Arc<dyn ProviderSession>)> {
        let slots = self.slots.read();
        slots.iter().filter(|s| s.info.is_connected()).find_map(|slot| {
            let tool = slot.info.tools.iter().find(|t| t.matches_name(name))?;
            let session = slot.session.clone()?;
            Some((
                ResolvedTool {
                    provider_id: slot.info.id.clone(),
                    tool: tool.clone(),
                },
                session,
            ))
        })
    }

    fn session_for(&self, resolved: &ResolvedTool) -> Option<Arc<dyn ProviderSession>> {
        self.slots
            .read()
            .iter()
            .find(|s| s.info.id == resolved.provider_id && s.info.is_connected())
            .filter(|s| s.info.tools.contains(&resolved.tool))
            .and_then(|s| s.session.clone())
    }

    async fn dispatch(
        &self,
        resolved: &ResolvedTool,
        session: Arc<dyn ProviderSession>,
        arguments: Map<String, Value>,
    ) -> InvocationResult<ToolOutput> {
        log_debug!(
            self.logger,
            "[ConnectionRegistry] Routing {} to {}",
            resolved.tool.name,
            resolved.provider_id
        );
        self.bounded("tools/call", session.call_tool(&resolved.tool.name, arguments))
            .await
            .map_err(|source| InvocationError::Provider {
                provider: resolved.provider_id.clone(),
                source,
            })
    }

    /// Run one provider request under the request timeout
    async fn bounded<T>(&self, operation: &str, request: impl Future<Output = McpResult<T>>) -> McpResult<T> {
        tokio::time::timeout(self.request_timeout, request)
            .await
            .unwrap_or_else(|_| {
                Err(McpError::Timeout {
                    operation: operation.to_string(),
                    after: self.request_timeout,
                })
            })
    }

    fn snapshot(&self, config: &ProviderConfig) -> ConnectionInfo {
        self.connection(config.id()).unwrap_or_else(|| ConnectionInfo {
            status: ConnectionStatus::Disconnected,
            ..ConnectionInfo::connecting(config)
        })
    }

    /// Mark entries `Connecting` in config order, then attempt them all
    ///
    /// New ids are appended; ids in `Error` or `Disconnected` are retried in
    /// place and keep their position.
    async fn connect_locked(&self, configs: &[ProviderConfig]) {
        let fresh: Vec<&ProviderConfig> = {
            let mut slots = self.slots.write();
            configs
                .iter()
                .filter(|config| match slots.iter().position(|s| s.info.id == config.id()) {
                    Some(index)
                        if matches!(
                            slots[index].info.status,
                            ConnectionStatus::Connecting | ConnectionStatus::Connected
                        ) =>
                    {
                        log_debug!(self.logger, "[ConnectionRegistry] {} already registered, skipping", config.id());
                        false
                    }
                    Some(index) => {
                        let slot = &mut slots[index];
                        log_debug!(self.logger, "[ConnectionRegistry] Retrying {} ({})", config.id(), slot.info.status);
                        slot.info = ConnectionInfo::connecting(config);
                        slot.session = None;
                        true
                    }
                    None => {
                        slots.push(Slot {
                            info: ConnectionInfo::connecting(config),
                            session: None,
                        });
                        true
                    }
                })
                .collect()
        };

        join_all(fresh.iter().map(|config| self.establish(config))).await;
        for config in &fresh {
            self.warn_shadowed(config.id());
        }
    }

    async fn establish(&self, config: &ProviderConfig) {
        self.logger.info(&format!(
            "[ConnectionRegistry] Connecting {} ({})",
            config.id(),
            config.kind()
        ));

        let opened = self.open(config).await;

        let mut slots = self.slots.write();
        let Some(slot) = slots.iter_mut().find(|s| s.info.id == config.id()) else {
            return;
        };
        match opened {
            Ok((session, tools)) => {
                self.logger.info(&format!(
                    "[ConnectionRegistry] Connected {} ({} tools)",
                    config.id(),
                    tools.len()
                ));
                slot.info.status = ConnectionStatus::Connected;
                slot.info.tools = tools;
                slot.info.last_error = None;
                slot.session = Some(session);
            }
            Err(e) => {
                self.logger.error(&format!(
                    "[ConnectionRegistry] Failed to connect {}: {}",
                    config.id(),
                    e
                ));
                slot.info.status = ConnectionStatus::Error;
                slot.info.tools.clear();
                slot.info.last_error = Some(e.to_string());
                slot.session = None;
            }
        }
    }

    /// Open a session and fetch its tools; a session whose listing fails is closed
    async fn open(&self, config: &ProviderConfig) -> McpResult<(Arc<dyn ProviderSession>, Vec<ToolInfo>)> {
        let session = self.bounded("connect", self.connector.connect(config)).await?;
        match self.bounded("tools/list", session.list_tools()).await {
            Ok(tools) => Ok((session, tools)),
            Err(e) => {
                if let Err(close_err) = self.bounded("close", session.close()).await {
                    self.logger.warn(&format!(
                        "[ConnectionRegistry] Error closing {} after failed listing: {}",
                        config.id(),
                        close_err
                    ));
                }
                Err(e)
            }
        }
    }

    /// Log tools of `id` that an earlier connection already provides
    fn warn_shadowed(&self, id: &str) {
        let slots = self.slots.read();
        let Some(position) = slots.iter().position(|s| s.info.id == id) else {
            return;
        };
        for tool in slots[position].info.usable_tools() {
            if let Some(owner) = slots[..position]
                .iter()
                .filter(|s| s.info.is_connected())
                .find(|s| s.info.tools.iter().any(|t| t.matches_name(&tool.name)))
            {
                log_warn!(
                    self.logger,
                    "[ConnectionRegistry] Tool {} from {} is shadowed by {}",
                    tool.name,
                    id,
                    owner.info.id
                );
            }
        }
    }

    async fn shutdown_locked(&self) {
        let drained: Vec<Slot> = self.slots.write().drain(..).collect();
        if drained.is_empty() {
            return;
        }
        log_info!(self.logger, "[ConnectionRegistry] Shutting down {} connection(s)", drained.len());
        join_all(drained.into_iter().map(|slot| self.close_slot(slot))).await;
    }

    async fn close_slot(&self, slot: Slot) {
        let Slot { info, session } = slot;
        let Some(session) = session else {
            log_debug!(self.logger, "[ConnectionRegistry] Removed {} ({})", info.id, info.status);
            return;
        };
        match self.bounded("close", session.close()).await {
            Ok(()) => log_info!(self.logger, "[ConnectionRegistry] Disconnected {}", info.id),
            Err(e) => log_warn!(self.logger, "[ConnectionRegistry] Error closing {}: {}", info.id, e),
        }
    }
}

use std::sync::Arc;

use parking_lot::RwLock;

use super::conversation::Conversation;
use crate::config::{ConfigResult, Profile, Settings};
use crate::logging::Logger;
use crate::orchestrator::{OrchestratorConfig, OrchestratorResult, RunOutcome, ToolCallOrchestrator};
use crate::registry::{ConnectionInfo, ConnectionRegistry};
use crate::router::ToolInvocationRouter;
use crate::transport::ChatTransport;
use crate::types::{CancellationToken, LinkedContext, Message};

/// Entry point for hosts: one service, many conversations
///
/// Conversations may be driven concurrently; they share the registry.
pub struct ChatService {
    transport: Arc<dyn ChatTransport>,
    registry: Arc<ConnectionRegistry>,
    router: Arc<ToolInvocationRouter>,
    profile: RwLock<Profile>,
    max_iterations: Option<usize>,
    logger: Arc<dyn Logger>,
}

impl ChatService {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        registry: Arc<ConnectionRegistry>,
        profile: Profile,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let router = Arc::new(ToolInvocationRouter::new(Arc::clone(&registry), Arc::clone(&logger)));
        Self {
            transport,
            registry,
            router,
            profile: RwLock::new(profile),
            max_iterations: None,
            logger,
        }
    }

    /// Override the per-turn round-trip cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// The active profile
    pub fn profile(&self) -> Profile {
        self.profile.read().clone()
    }

    /// Apply the settings' active profile and connect its providers
    pub async fn activate(&self, settings: &Settings) -> Vec<ConnectionInfo> {
        self.apply(settings, settings.active_profile()).await
    }

    /// Make `name` the active profile and reconnect providers to match
    ///
    /// Teardown and reconnect happen in one critical section on the registry.
    pub async fn switch_profile(&self, settings: &Settings, name: &str) -> ConfigResult<Vec<ConnectionInfo>> {
        let profile = settings.profile(name)?.clone();
        Ok(self.apply(settings, profile).await)
    }

    async fn apply(&self, settings: &Settings, profile: Profile) -> Vec<ConnectionInfo> {
        for id in settings.unknown_providers(&profile) {
            self.logger.warn(&format!(
                "[ChatService] Profile {} enables unknown provider {}",
                profile.name, id
            ));
        }
        let configs = settings.enabled_provider_configs(&profile);
        self.logger.info(&format!(
            "[ChatService] Activating profile {} ({} providers)",
            profile.name,
            configs.len()
        ));

        *self.profile.write() = profile;
        self.registry.switch_providers(&configs).await
    }

    /// Append `text` as a user message and run one turn
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        text: &str,
        linked: Vec<LinkedContext>,
    ) -> OrchestratorResult<RunOutcome> {
        self.run_turn(conversation, text, linked, None).await
    }

    /// `send`, stoppable through `token`
    pub async fn send_cancellable(
        &self,
        conversation: &mut Conversation,
        text: &str,
        linked: Vec<LinkedContext>,
        token: CancellationToken,
    ) -> OrchestratorResult<RunOutcome> {
        self.run_turn(conversation, text, linked, Some(token)).await
    }

    /// Close every provider connection
    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
    }

    async fn run_turn(
        &self,
        conversation: &mut Conversation,
        text: &str,
        linked: Vec<LinkedContext>,
        token: Option<CancellationToken>,
    ) -> OrchestratorResult<RunOutcome> {
        conversation
            .transcript
            .push(Message::user(text).with_linked_context(linked.clone()));

        let tools = self.registry.available_tools();
        let mut config = OrchestratorConfig::from_profile(&self.profile.read());
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }

        self.logger.debug(&format!(
            "[ChatService] Turn in {} with {} tools on {}",
            conversation.id,
            tools.len(),
            config.model
        ));

        let mut orchestrator = ToolCallOrchestrator::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.router),
            config,
            Arc::clone(&self.logger),
        );
        if let Some(token) = token {
            orchestrator = orchestrator.with_cancellation(token);
        }
        orchestrator.run(&mut conversation.transcript, &linked, &tools).await
    }
}

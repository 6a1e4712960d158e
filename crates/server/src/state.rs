use events::EventBus;
use generation::{ChatClient, ChatConfig, LlmCodeGenerator};
use github::{GitHubClient, GitHubConfig, GitHubPages, GitHubPublisher};
use orchestrator::{HttpCallbackTransport, OrchestratorConfig, TaskOrchestrator};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{ConfigError, HandlerConfig};

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("GitHub client: {0}")]
    GitHub(#[from] github::GitHubError),

    #[error("Generation client: {0}")]
    Generation(#[from] generation::GenerationError),

    #[error("Callback transport: {0}")]
    Callback(#[from] orchestrator::TransportError),
}

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TaskOrchestrator>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(orchestrator: Arc<TaskOrchestrator>, event_bus: EventBus) -> Self {
        Self {
            orchestrator,
            event_bus,
        }
    }

    /// Wire the production collaborators from `config`.
    pub fn from_config(config: &HandlerConfig) -> Result<Self, StateError> {
        config.validate()?;

        let github = Arc::new(GitHubClient::new(
            &GitHubConfig::new(config.github_token.clone())
                .with_api_url(config.github_api_url.clone())
                .with_timeout(config.github_timeout),
        )?);

        let chat = ChatClient::new(
            ChatConfig::new(config.generation_api_key.clone())
                .with_base_url(config.generation_base_url.clone())
                .with_model(config.generation_model.clone())
                .with_timeout(config.generation_timeout),
        )?;

        let transport = HttpCallbackTransport::new(config.callback_timeout)?;

        let event_bus = EventBus::new();
        let orchestrator = TaskOrchestrator::new(
            OrchestratorConfig::new(config.expected_secret.clone())
                .with_retry_schedule(config.retry_schedule.clone())
                .with_callback_timeout(config.callback_timeout),
            Arc::new(LlmCodeGenerator::new(chat)),
            Arc::new(GitHubPublisher::new(Arc::clone(&github))),
            Arc::new(GitHubPages::new(github)),
            Arc::new(transport),
        )
        .with_event_bus(event_bus.clone());

        Ok(Self::new(Arc::new(orchestrator), event_bus))
    }
}

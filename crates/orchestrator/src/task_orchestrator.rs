use events::{Event, EventBus};
use handler_core::{
    CodeGenerator, CreateTaskResponse, EvaluationPayload, ModifyTaskResponse, PagesActivator,
    RepoMetadata, RepoRef, RepositoryPublisher, Round, TaskRequest, TaskResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::callback::{CallbackDelivery, CallbackTransport};
use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, Result};
use crate::naming::RepoNamer;
use crate::templates;

/// How an inbound route decides the round of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePolicy {
    /// The body must carry `round`
    FromBody,
    /// The route implies the round, overriding the body
    Force(Round),
}

impl RoutePolicy {
    fn prepare(self, body: &mut Value) {
        let RoutePolicy::Force(round) = self else {
            return;
        };
        let Some(fields) = body.as_object_mut() else {
            return;
        };

        fields.insert("round".to_string(), Value::from(round.as_number()));

        // Older round-2 clients send the instruction as `modification`
        if round == Round::Modify {
            let brief_missing = fields
                .get("brief")
                .and_then(Value::as_str)
                .map_or(true, |brief| brief.trim().is_empty());
            if brief_missing {
                if let Some(modification) = fields.get("modification").cloned() {
                    fields.insert("brief".to_string(), modification);
                }
            }
        }
    }
}

/// Result of a handled task.
///
/// `callback` is the background delivery, present when the request named an
/// evaluation URL. The response never waits for it.
#[derive(Debug)]
pub struct TaskOutcome {
    pub run_id: Uuid,
    pub response: TaskResponse,
    pub callback: Option<JoinHandle<bool>>,
}

pub struct TaskOrchestrator {
    config: OrchestratorConfig,
    generator: Arc<dyn CodeGenerator>,
    publisher: Arc<dyn RepositoryPublisher>,
    pages: Arc<dyn PagesActivator>,
    callbacks: CallbackDelivery,
    namer: RepoNamer,
    event_bus: Option<EventBus>,
}

impl TaskOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        generator: Arc<dyn CodeGenerator>,
        publisher: Arc<dyn RepositoryPublisher>,
        pages: Arc<dyn PagesActivator>,
        transport: Arc<dyn CallbackTransport>,
    ) -> Self {
        let callbacks = CallbackDelivery::new(transport, config.retry_schedule.clone())
            .with_attempt_timeout(config.callback_timeout);

        Self {
            config,
            generator,
            publisher,
            pages,
            callbacks,
            namer: RepoNamer::new(),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.callbacks = self.callbacks.with_event_bus(bus.clone());
        self.event_bus = Some(bus);
        self
    }

    fn emit_event(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }

    /// Exact comparison against the configured secret. An unset configured
    /// secret rejects everything.
    pub fn authorize(&self, secret: Option<&str>) -> Result<()> {
        match secret {
            Some(secret)
                if !self.config.expected_secret.is_empty()
                    && secret == self.config.expected_secret =>
            {
                Ok(())
            }
            _ => {
                warn!("Rejected task with invalid secret");
                Err(OrchestratorError::Authorization)
            }
        }
    }

    /// Entry point for raw request bodies.
    ///
    /// The secret is checked before the rest of the body is interpreted.
    pub async fn handle_json(&self, mut body: Value, policy: RoutePolicy) -> Result<TaskOutcome> {
        self.authorize(body.get("secret").and_then(Value::as_str))?;

        policy.prepare(&mut body);
        let request: TaskRequest = serde_json::from_value(body)
            .map_err(|e| OrchestratorError::Validation(format!("Invalid request body: {}", e)))?;

        self.handle_task(request).await
    }

    pub async fn handle_task(&self, request: TaskRequest) -> Result<TaskOutcome> {
        self.authorize(request.secret.as_deref())?;
        let round = request.round()?;

        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            task = %request.task,
            nonce = %request.nonce,
            round = round.as_number(),
            "Task received"
        );
        self.emit_event(Event::TaskReceived {
            run_id,
            task: request.task.clone(),
            nonce: request.nonce.clone(),
            round: round.as_number(),
        });

        let result = match round {
            Round::Create => self.create(run_id, &request).await,
            Round::Modify => self.modify(run_id, &request).await,
        };

        if let Err(OrchestratorError::Processing(ref message)) = result {
            warn!(run_id = %run_id, error = %message, "Task processing failed");
            self.emit_event(Event::TaskFailed {
                run_id,
                message: message.clone(),
            });
        }

        result
    }

    async fn create(&self, run_id: Uuid, request: &TaskRequest) -> Result<TaskOutcome> {
        let repo_name = self.namer.name(&request.task, &request.nonce);
        info!(run_id = %run_id, repo = %repo_name, "Generating application");

        let mut files = self
            .generator
            .generate(&request.brief, &request.attachments, &request.checks)
            .await;
        files.insert("LICENSE", templates::MIT_LICENSE);
        files.insert(
            "README.md",
            templates::readme(&request.brief, &request.task, &request.email, &repo_name),
        );

        let published = self
            .publisher
            .create(&repo_name, &files, &RepoMetadata::for_brief(&request.brief))
            .await?;
        info!(
            run_id = %run_id,
            repo_url = %published.repo_url,
            commit_sha = %published.commit_sha,
            "Repository published"
        );
        self.emit_event(Event::RepositoryPublished {
            run_id,
            repo_url: published.repo_url.clone(),
            commit_sha: published.commit_sha.clone(),
        });

        let full_name = RepoRef::from_html_url(&published.repo_url)
            .map(|repo| repo.full_name())
            .unwrap_or_else(|| repo_name.clone());
        let activation = self.pages.activate(&full_name).await;
        if activation.enabled {
            self.emit_event(Event::PagesActivated {
                run_id,
                pages_url: activation.url.clone(),
            });
        } else {
            warn!(run_id = %run_id, repo = %full_name, "Pages not enabled, reporting repository URL");
        }
        let pages_url = activation.url;

        let payload = EvaluationPayload::for_request(
            request,
            Round::Create,
            published.repo_url.clone(),
            published.commit_sha,
            pages_url.clone(),
        );
        let callback = self.dispatch_callback(run_id, request, payload);

        Ok(TaskOutcome {
            run_id,
            response: TaskResponse::Created(CreateTaskResponse::success(
                published.repo_url,
                pages_url,
                callback.is_some(),
            )),
            callback,
        })
    }

    async fn modify(&self, run_id: Uuid, request: &TaskRequest) -> Result<TaskOutcome> {
        let repo_name = request.required_repo_name()?.to_string();
        info!(run_id = %run_id, repo = %repo_name, "Modifying repository");

        let files = self
            .generator
            .modify(&request.brief, &repo_name, &request.checks)
            .await;
        if files.is_error() {
            warn!(
                run_id = %run_id,
                repo = %repo_name,
                error = files.error_message().unwrap_or_default(),
                "Modification produced no files"
            );
        }

        let commit_sha = self.publisher.update(&repo_name, &files).await?;
        info!(run_id = %run_id, repo = %repo_name, commit_sha = %commit_sha, "Repository updated");
        self.emit_event(Event::RepositoryUpdated {
            run_id,
            repo_name: repo_name.clone(),
            commit_sha: commit_sha.clone(),
        });

        let repo = RepoRef::parse(&repo_name);
        let payload = EvaluationPayload::for_request(
            request,
            Round::Modify,
            repo.html_url(),
            commit_sha.clone(),
            repo.pages_url(),
        );
        let callback = self.dispatch_callback(run_id, request, payload);

        Ok(TaskOutcome {
            run_id,
            response: TaskResponse::Modified(ModifyTaskResponse::success(commit_sha)),
            callback,
        })
    }

    fn dispatch_callback(
        &self,
        run_id: Uuid,
        request: &TaskRequest,
        payload: EvaluationPayload,
    ) -> Option<JoinHandle<bool>> {
        let url = request.evaluation_target()?;
        info!(run_id = %run_id, url = %url, "Scheduling evaluation callback");
        Some(self.callbacks.spawn(run_id, url.to_string(), payload))
    }
}

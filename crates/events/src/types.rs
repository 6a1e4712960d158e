//! Event types for the pipeline event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events in the system
///
/// `run_id` identifies one pipeline execution; it is assigned when the
/// request passes the secret gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A request passed authorization and entered the pipeline
    #[serde(rename = "task.received")]
    TaskReceived {
        run_id: Uuid,
        task: String,
        nonce: String,
        round: i64,
    },

    /// A new repository was created and its files written
    #[serde(rename = "repository.published")]
    RepositoryPublished {
        run_id: Uuid,
        repo_url: String,
        commit_sha: String,
    },

    /// Static hosting was enabled for a repository
    #[serde(rename = "pages.activated")]
    PagesActivated { run_id: Uuid, pages_url: String },

    /// Files in an existing repository were overwritten
    #[serde(rename = "repository.updated")]
    RepositoryUpdated {
        run_id: Uuid,
        repo_name: String,
        commit_sha: String,
    },

    /// The evaluator acknowledged the notification
    #[serde(rename = "callback.delivered")]
    CallbackDelivered {
        run_id: Uuid,
        url: String,
        attempts: u32,
    },

    /// Every scheduled notification attempt failed
    #[serde(rename = "callback.failed")]
    CallbackFailed {
        run_id: Uuid,
        url: String,
        attempts: u32,
    },

    /// The pipeline aborted with a processing failure
    #[serde(rename = "task.failed")]
    TaskFailed { run_id: Uuid, message: String },
}

impl Event {
    /// Get the pipeline run this event belongs to
    pub fn run_id(&self) -> Uuid {
        match self {
            Event::TaskReceived { run_id, .. }
            | Event::RepositoryPublished { run_id, .. }
            | Event::PagesActivated { run_id, .. }
            | Event::RepositoryUpdated { run_id, .. }
            | Event::CallbackDelivered { run_id, .. }
            | Event::CallbackFailed { run_id, .. }
            | Event::TaskFailed { run_id, .. } => *run_id,
        }
    }

    /// Whether this event ends callback delivery for its run
    pub fn is_callback_outcome(&self) -> bool {
        matches!(
            self,
            Event::CallbackDelivered { .. } | Event::CallbackFailed { .. }
        )
    }
}

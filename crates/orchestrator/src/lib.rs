pub mod callback;
pub mod config;
pub mod error;
pub mod naming;
pub mod task_orchestrator;
pub mod templates;

pub use callback::{
    CallbackDelivery, CallbackTransport, HttpCallbackTransport, RetrySchedule, TransportError,
};
pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, Result};
pub use naming::RepoNamer;
pub use task_orchestrator::{RoutePolicy, TaskOrchestrator, TaskOutcome};

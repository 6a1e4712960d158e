use handler_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Invalid secret")]
    Authorization,

    #[error("{0}")]
    Validation(String),

    #[error("Task processing failed: {0}")]
    Processing(String),
}

impl OrchestratorError {
    pub fn processing(cause: impl std::fmt::Display) -> Self {
        Self::Processing(cause.to_string())
    }
}

impl From<CoreError> for OrchestratorError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => Self::Validation(message),
            err if err.is_validation() => Self::Validation(err.to_string()),
            err => Self::processing(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

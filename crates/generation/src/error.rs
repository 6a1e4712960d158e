use thiserror::Error;

/// Generation-specific error types
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Empty completion: no choices returned")]
    EmptyCompletion,

    #[error("Reply is not a file map: {0}")]
    UnparseableReply(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GenerationError {
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::UnparseableReply(_))
    }
}

/// Result type alias for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

use handler_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GitHub error: {0}")]
    Remote(String),

    #[error("Failed to create repository: {0}")]
    RepoCreation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl GitHubError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => GitHubError::Remote(source.message.clone()),
            _ => GitHubError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GitHubError {
    fn from(err: serde_json::Error) -> Self {
        GitHubError::Decode(err.to_string())
    }
}

impl From<GitHubError> for CoreError {
    fn from(err: GitHubError) -> Self {
        CoreError::upstream("GitHub", err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

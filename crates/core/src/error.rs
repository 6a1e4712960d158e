use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid round number {0}. Must be 1 or 2")]
    UnsupportedRound(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{service} failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },
}

impl CoreError {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Validation errors are the caller's fault and map to a 400.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::UnsupportedRound(_) | Self::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CoreError::UnsupportedRound(5);
        assert!(error.to_string().contains('5'));
        assert!(error.is_validation());
    }

    #[test]
    fn test_upstream_is_not_validation() {
        let error = CoreError::upstream("GitHub", "Failed to create repository");
        assert_eq!(error.to_string(), "GitHub failed: Failed to create repository");
        assert!(!error.is_validation());
    }
}

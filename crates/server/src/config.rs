use orchestrator::RetrySchedule;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub use generation::{
    DEFAULT_BASE_URL as DEFAULT_GENERATION_BASE_URL, DEFAULT_MODEL as DEFAULT_GENERATION_MODEL,
};
pub use github::types::DEFAULT_API_URL as DEFAULT_GITHUB_API_URL;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Everything the handler needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub expected_secret: String,
    pub github_token: String,
    pub generation_api_key: String,
    pub generation_base_url: String,
    pub generation_model: String,
    pub github_api_url: String,
    pub port: u16,
    pub generation_timeout: Duration,
    pub github_timeout: Duration,
    pub callback_timeout: Duration,
    pub retry_schedule: RetrySchedule,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            expected_secret: String::new(),
            github_token: String::new(),
            generation_api_key: String::new(),
            generation_base_url: DEFAULT_GENERATION_BASE_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            port: DEFAULT_PORT,
            generation_timeout: Duration::from_secs(60),
            github_timeout: Duration::from_secs(30),
            callback_timeout: Duration::from_secs(30),
            retry_schedule: RetrySchedule::default(),
        }
    }
}

impl HandlerConfig {
    /// The secret and GitHub token are required; a missing generation key
    /// only means every create falls back to the default application.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expected_secret.trim().is_empty() {
            return Err(ConfigError::Missing("EXPECTED_SECRET"));
        }
        if self.github_token.trim().is_empty() {
            return Err(ConfigError::Missing("GITHUB_TOKEN"));
        }
        Ok(())
    }

    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            expected_secret: presence(&self.expected_secret),
            github_token: presence(&self.github_token),
            generation_api_key: presence(&self.generation_api_key),
            generation_base_url: self.generation_base_url.clone(),
            generation_model: self.generation_model.clone(),
            github_api_url: self.github_api_url.clone(),
            port: self.port,
            callback_delays_secs: self
                .retry_schedule
                .delays()
                .iter()
                .map(Duration::as_secs_f64)
                .collect(),
        }
    }
}

fn presence(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "missing"
    } else {
        "set"
    }
}

/// Configuration safe to print: credentials are reduced to set/missing.
#[derive(Debug, Serialize)]
pub struct RedactedConfig {
    pub expected_secret: &'static str,
    pub github_token: &'static str,
    pub generation_api_key: &'static str,
    pub generation_base_url: String,
    pub generation_model: String,
    pub github_api_url: String,
    pub port: u16,
    pub callback_delays_secs: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> HandlerConfig {
        HandlerConfig {
            expected_secret: "s3cret".to_string(),
            github_token: "ghp_abcdef".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_requires_secret_and_token() {
        assert!(configured().validate().is_ok());

        let missing_secret = HandlerConfig {
            expected_secret: " ".to_string(),
            ..configured()
        };
        assert!(matches!(
            missing_secret.validate(),
            Err(ConfigError::Missing("EXPECTED_SECRET"))
        ));

        let missing_token = HandlerConfig {
            github_token: String::new(),
            ..configured()
        };
        assert!(matches!(
            missing_token.validate(),
            Err(ConfigError::Missing("GITHUB_TOKEN"))
        ));
    }

    #[test]
    fn test_redacted_hides_credentials() {
        let rendered = serde_json::to_string(&configured().redacted()).unwrap();
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("ghp_abcdef"));
        assert!(rendered.contains(r#""generation_api_key":"missing""#));
        assert!(rendered.contains(r#""callback_delays_secs":[1.0,2.0,4.0,8.0,16.0,32.0]"#));
    }
}

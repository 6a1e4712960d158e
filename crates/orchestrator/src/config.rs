use std::time::Duration;

use crate::callback::RetrySchedule;

const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Shared secret every inbound task must carry
    pub expected_secret: String,
    pub retry_schedule: RetrySchedule,
    pub callback_timeout: Duration,
}

impl OrchestratorConfig {
    pub fn new(expected_secret: impl Into<String>) -> Self {
        Self {
            expected_secret: expected_secret.into(),
            retry_schedule: RetrySchedule::default(),
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
        }
    }

    pub fn with_retry_schedule(mut self, schedule: RetrySchedule) -> Self {
        self.retry_schedule = schedule;
        self
    }

    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = timeout;
        self
    }
}

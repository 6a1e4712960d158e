//! Evaluation callback delivery with bounded exponential backoff

use async_trait::async_trait;
use events::{Event, EventBus};
use handler_core::EvaluationPayload;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

const DEFAULT_DELAYS_SECS: [u64; 6] = [1, 2, 4, 8, 16, 32];
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Network(String),
}

/// Sends one notification attempt and reports the response status.
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    async fn post(&self, url: &str, payload: &EvaluationPayload) -> Result<u16, TransportError>;
}

/// JSON POST over reqwest.
pub struct HttpCallbackTransport {
    client: reqwest::Client,
}

impl HttpCallbackTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CallbackTransport for HttpCallbackTransport {
    async fn post(&self, url: &str, payload: &EvaluationPayload) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        Ok(response.status().as_u16())
    }
}

/// Delay paired with each attempt. The delay of the last attempt is never
/// slept, so `[1, 2, 4, 8, 16, 32]` means six attempts with waits of 1 to 16s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(DEFAULT_DELAYS_SECS.iter().copied().map(Duration::from_secs).collect())
    }
}

impl RetrySchedule {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// Always at least one attempt.
    pub fn attempts(&self) -> usize {
        self.delays.len().max(1)
    }

    /// Wait after the failed attempt at `index`, or `None` when it was the last.
    pub fn wait_after(&self, index: usize) -> Option<Duration> {
        if index + 1 >= self.attempts() {
            return None;
        }
        self.delays.get(index).copied()
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}

/// Delivers evaluation payloads, retrying until an HTTP 200 or the schedule
/// runs out. Outcomes are logged and published, never returned as errors.
#[derive(Clone)]
pub struct CallbackDelivery {
    transport: Arc<dyn CallbackTransport>,
    schedule: RetrySchedule,
    attempt_timeout: Duration,
    event_bus: Option<EventBus>,
}

impl CallbackDelivery {
    pub fn new(transport: Arc<dyn CallbackTransport>, schedule: RetrySchedule) -> Self {
        Self {
            transport,
            schedule,
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            event_bus: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    fn emit_event(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }

    async fn attempt(&self, url: &str, payload: &EvaluationPayload) -> Result<u16, TransportError> {
        match tokio::time::timeout(self.attempt_timeout, self.transport.post(url, payload)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }

    /// Returns true once the evaluator answers 200.
    pub async fn deliver(&self, run_id: Uuid, url: &str, payload: &EvaluationPayload) -> bool {
        let attempts = self.schedule.attempts();

        for index in 0..attempts {
            let attempt = index as u32 + 1;

            match self.attempt(url, payload).await {
                Ok(200) => {
                    info!(url = %url, attempt, "Evaluation callback delivered");
                    self.emit_event(Event::CallbackDelivered {
                        run_id,
                        url: url.to_string(),
                        attempts: attempt,
                    });
                    return true;
                }
                Ok(status) => {
                    warn!(url = %url, attempt, status, "Evaluation callback rejected");
                }
                Err(e) => {
                    warn!(url = %url, attempt, error = %e, "Evaluation callback failed");
                }
            }

            if let Some(wait) = self.schedule.wait_after(index) {
                info!(url = %url, wait_secs = wait.as_secs_f64(), "Retrying evaluation callback");
                tokio::time::sleep(wait).await;
            }
        }

        error!(url = %url, attempts, "Evaluation callback failed after all attempts");
        self.emit_event(Event::CallbackFailed {
            run_id,
            url: url.to_string(),
            attempts: attempts as u32,
        });
        false
    }

    /// Run [`deliver`](Self::deliver) on a background task.
    pub fn spawn(&self, run_id: Uuid, url: String, payload: EvaluationPayload) -> JoinHandle<bool> {
        let delivery = self.clone();
        tokio::spawn(async move { delivery.deliver(run_id, &url, &payload).await })
    }
}

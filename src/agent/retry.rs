//! Bounded retry with exponential backoff around any [`AgentClient`].

use super::AgentClient;
use crate::error::AgentError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// Reply text prefix once retries are exhausted
pub const EXHAUSTED_PREFIX: &str = "Sorry, I encountered an error during processing: ";

pub struct RetryingAgent<C> {
    inner: C,
    max_retries: u32,
    initial_backoff: Duration,
}

impl<C: AgentClient> RetryingAgent<C> {
    pub fn new(inner: C, max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            initial_backoff,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// `initial_backoff * 2^attempt`, saturating.
    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[async_trait]
impl<C: AgentClient> AgentClient for RetryingAgent<C> {
    /// Transient failures are retried up to `max_retries` times and then turned into a
    /// reply string. Terminal failures are returned immediately.
    async fn interact(&self, prompt: &str, user_id: &str) -> Result<String, AgentError> {
        let mut attempt = 0;
        loop {
            match self.inner.interact(prompt, user_id).await {
                Ok(reply) => return Ok(reply),
                Err(AgentError::Transient(cause)) => {
                    if attempt >= self.max_retries {
                        warn!(attempts = attempt + 1, cause = %cause, "Agent retries exhausted");
                        return Ok(format!("{}{}", EXHAUSTED_PREFIX, cause));
                    }
                    let delay = self.backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        cause = %cause,
                        "Transient agent error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }

    fn service_name(&self) -> &str {
        self.inner.service_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

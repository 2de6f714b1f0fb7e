//! Agent collaborator
//!
//! The REPL forwards free text to an [`AgentClient`]. Clients are built from
//! [`AgentSettings`] by [`build_agent`]; the Gemini client is always wrapped in a
//! [`RetryingAgent`] so transient failures never reach the session loop as errors.

use crate::error::AgentError;
use async_trait::async_trait;

pub mod gemini;
pub mod mock;
pub mod retry;
pub mod settings;

pub use gemini::GeminiClient;
pub use mock::MockAgent;
pub use retry::{RetryingAgent, EXHAUSTED_PREFIX};
pub use settings::{parse_setting_value, AgentSettings, SettingValue};

/// Default identifier for conversation state
pub const DEFAULT_USER_ID: &str = "repl_user";

#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Send one prompt on behalf of `user_id` and return the reply text.
    async fn interact(&self, prompt: &str, user_id: &str) -> Result<String, AgentError>;

    fn service_name(&self) -> &str;

    fn model_name(&self) -> &str;
}

/// Stand-in used when the provider cannot be reached at all (for example a missing
/// API key). Every interaction fails with the stored reason.
pub struct UnconfiguredAgent {
    service: String,
    model: String,
    reason: String,
}

impl UnconfiguredAgent {
    pub fn new(service: impl Into<String>, model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            model: model.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl AgentClient for UnconfiguredAgent {
    async fn interact(&self, _prompt: &str, _user_id: &str) -> Result<String, AgentError> {
        Err(AgentError::NotConfigured(self.reason.clone()))
    }

    fn service_name(&self) -> &str {
        &self.service
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Build the client named by `settings.provider`.
pub fn build_agent(settings: &AgentSettings) -> Result<Box<dyn AgentClient>, AgentError> {
    match settings.provider.to_ascii_lowercase().as_str() {
        "mock" => Ok(Box::new(MockAgent::new(settings.model.clone()))),
        "gemini" => {
            let api_key = std::env::var(&settings.api_key_env)
                .ok()
                .filter(|key| !key.trim().is_empty());
            let Some(api_key) = api_key else {
                tracing::warn!(
                    env = %settings.api_key_env,
                    "API key not set; agent functionality will be limited"
                );
                return Ok(Box::new(UnconfiguredAgent::new(
                    gemini::SERVICE_NAME,
                    settings.model.clone(),
                    format!(
                        "Agent model not configured ({} missing?)",
                        settings.api_key_env
                    ),
                )));
            };
            let client = GeminiClient::new(settings, api_key)?;
            Ok(Box::new(RetryingAgent::new(
                client,
                settings.max_retries,
                settings.initial_backoff(),
            )))
        }
        other => Err(AgentError::NotConfigured(format!(
            "Unknown agent provider: {} (expected 'gemini' or 'mock')",
            other
        ))),
    }
}

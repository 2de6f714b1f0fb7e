//! Offline agent with keyword-based canned replies.

use super::AgentClient;
use crate::error::AgentError;
use async_trait::async_trait;

pub const SERVICE_NAME: &str = "mock";

const HELP_REPLY: &str = "I can help you with:

- Understanding document content
- Summarizing information
- Answering questions about your documents
- Generating content based on your instructions

Just ask me a question or give me a task related to your documents.";

pub struct MockAgent {
    model: String,
}

impl MockAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Greeting words match whole words only, so "this" is not a greeting.
    pub fn reply(text: &str) -> String {
        let lower = text.to_lowercase();
        let has_word = |word: &str| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == word)
        };
        if has_word("hello") || has_word("hi") {
            return "Hello! How can I assist you today?".to_string();
        }
        if lower.contains("help") {
            return HELP_REPLY.to_string();
        }
        if text.contains('?') {
            return format!(
                "That's an interesting question about '{}'. In a real implementation, I would provide a thoughtful answer here.",
                text
            );
        }
        format!(
            "I received your input: '{}'\n\nIn a full implementation, I would provide a thoughtful response here based on advanced AI processing.",
            text
        )
    }
}

impl Default for MockAgent {
    fn default() -> Self {
        Self::new("mock")
    }
}

#[async_trait]
impl AgentClient for MockAgent {
    async fn interact(&self, prompt: &str, _user_id: &str) -> Result<String, AgentError> {
        Ok(Self::reply(prompt))
    }

    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

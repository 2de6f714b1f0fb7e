//! Gemini `generateContent` client with per-user conversation history.

use super::settings::{AgentSettings, SettingValue};
use super::AgentClient;
use crate::error::AgentError;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub const SERVICE_NAME: &str = "gemini";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant interacting with document context.";

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content,
    contents: &'a [Content],
    #[serde(skip_serializing_if = "GenerationConfig::is_empty")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i64>,
}

impl GenerationConfig {
    fn from_extra(extra: &std::collections::BTreeMap<String, SettingValue>) -> Self {
        Self {
            temperature: extra.get("temperature").and_then(SettingValue::as_f64),
            top_p: extra.get("top_p").and_then(SettingValue::as_f64),
            top_k: extra.get("top_k").and_then(SettingValue::as_i64),
            max_output_tokens: extra.get("max_output_tokens").and_then(SettingValue::as_i64),
        }
    }

    fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
            && self.max_output_tokens.is_none()
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Rate limits, server errors, timeouts, and dropped connections are worth retrying.
fn map_http_error(error: reqwest::Error) -> AgentError {
    if let Some(status) = error.status() {
        classify_status(status.as_u16(), &error.to_string())
    } else if error.is_timeout() {
        AgentError::Transient(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        AgentError::Transient(format!("Connection error: {}", error))
    } else {
        AgentError::Terminal(format!("HTTP error: {}", error))
    }
}

fn classify_status(status: u16, detail: &str) -> AgentError {
    match status {
        429 => AgentError::Transient(format!("Rate limit exceeded: {}", detail)),
        500..=599 => AgentError::Transient(format!("Server error {}: {}", status, detail)),
        401 | 403 => AgentError::Terminal(format!("Authentication failed: {}", detail)),
        404 => AgentError::Terminal(format!("Model not found: {}", detail)),
        _ => AgentError::Terminal(format!("Request failed with status {}: {}", status, detail)),
    }
}

pub struct GeminiClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
    generation: GenerationConfig,
    history: Mutex<HashMap<String, Vec<Content>>>,
}

impl GeminiClient {
    /// A `base_url` text entry in `settings.extra` overrides the public endpoint.
    pub fn new(settings: &AgentSettings, api_key: String) -> Result<Self, AgentError> {
        let client = Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AgentError::Terminal(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = match settings.extra.get("base_url") {
            Some(SettingValue::Text(url)) => url.trim_end_matches('/').to_string(),
            _ => DEFAULT_BASE_URL.to_string(),
        };
        Ok(Self {
            client,
            model: settings.model.clone(),
            api_key,
            base_url,
            generation: GenerationConfig::from_extra(&settings.extra),
            history: Mutex::new(HashMap::new()),
        })
    }

    /// Number of stored turns (user and model) for `user_id`.
    pub fn history_len(&self, user_id: &str) -> usize {
        self.history.lock().get(user_id).map_or(0, Vec::len)
    }

    pub fn clear_history(&self, user_id: &str) {
        self.history.lock().remove(user_id);
    }
}

#[async_trait]
impl AgentClient for GeminiClient {
    async fn interact(&self, prompt: &str, user_id: &str) -> Result<String, AgentError> {
        let mut contents = self
            .history
            .lock()
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        contents.push(Content::text("user", prompt));

        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: &contents,
            generation_config: GenerationConfig {
                temperature: self.generation.temperature,
                top_p: self.generation.top_p,
                top_k: self.generation.top_k,
                max_output_tokens: self.generation.max_output_tokens,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, turns = contents.len(), "Sending generateContent request");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, &error_text));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Terminal(format!("Failed to parse response: {}", e)))?;

        let text = body
            .candidates
            .into_iter()
            .find_map(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                AgentError::Terminal("Received an empty response from the agent".to_string())
            })?;

        contents.push(Content::text("model", &text));
        self.history.lock().insert(user_id.to_string(), contents);
        Ok(text)
    }

    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

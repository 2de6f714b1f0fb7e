//! Agent settings: a few typed fields plus free-form model parameters.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Loosely typed setting value, as typed at `/ai settings key=value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SettingValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// `true`/`false` (any case) become Bool, all digits become Int, digits with a single
/// dot become Float. Everything else stays Text.
pub fn parse_setting_value(raw: &str) -> SettingValue {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return SettingValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return SettingValue::Bool(false);
    }
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if is_digits(trimmed) {
        if let Ok(i) = trimmed.parse() {
            return SettingValue::Int(i);
        }
    }
    if trimmed.matches('.').count() == 1 {
        let digits = trimmed.replace('.', "");
        if is_digits(&digits) {
            if let Ok(f) = trimmed.parse() {
                return SettingValue::Float(f);
            }
        }
    }
    SettingValue::Text(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// `gemini` or `mock`
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Model parameters such as `temperature`
    #[serde(flatten)]
    pub extra: BTreeMap<String, SettingValue>,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            extra: BTreeMap::new(),
        }
    }
}

impl AgentSettings {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Update a typed field when `key` names one, otherwise store it in `extra`.
    pub fn apply(&mut self, key: &str, value: SettingValue) -> Result<(), ApiError> {
        match key {
            "provider" => self.provider = value.to_string(),
            "model" => self.model = value.to_string(),
            "api_key_env" => self.api_key_env = value.to_string(),
            "max_retries" => {
                self.max_retries = value
                    .as_i64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| invalid(key, &value, "a non-negative integer"))?;
            }
            "initial_backoff_ms" => {
                self.initial_backoff_ms = value
                    .as_i64()
                    .and_then(|v| u64::try_from(v).ok())
                    .ok_or_else(|| invalid(key, &value, "a non-negative integer"))?;
            }
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Every setting as display pairs, typed fields first.
    pub fn display_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("provider".to_string(), self.provider.clone()),
            ("model".to_string(), self.model.clone()),
            ("api_key_env".to_string(), self.api_key_env.clone()),
            ("max_retries".to_string(), self.max_retries.to_string()),
            (
                "initial_backoff_ms".to_string(),
                self.initial_backoff_ms.to_string(),
            ),
        ];
        pairs.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.to_string())));
        pairs
    }
}

fn invalid(key: &str, value: &SettingValue, expected: &str) -> ApiError {
    ApiError::ConfigError(format!(
        "Invalid value for {}: {} (expected {})",
        key, value, expected
    ))
}

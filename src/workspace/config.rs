//! `.airic/config.yaml`: a flat YAML mapping with a few recognized keys.

use crate::document::value_to_string;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_VERSION: &str = "0.1.0";

/// Workspace configuration. Unknown keys are kept and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceConfig(BTreeMap<String, serde_yaml::Value>);

impl WorkspaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_yaml::from_str::<serde_yaml::Value>(raw)? {
            serde_yaml::Value::Mapping(mapping) => Ok(Self(
                mapping
                    .into_iter()
                    .filter_map(|(k, v)| value_to_string(&k).map(|k| (k, v)))
                    .collect(),
            )),
            serde_yaml::Value::Null => Ok(Self::default()),
            other => {
                // Surface a real deserialize error for non-mapping documents.
                serde_yaml::from_value::<BTreeMap<String, serde_yaml::Value>>(other).map(Self)
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.0)
    }

    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.0.get(key)
    }

    /// Scalar value rendered as a string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(value_to_string)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn name(&self) -> Option<String> {
        self.get_str("name")
    }

    pub fn description(&self) -> Option<String> {
        self.get_str("description")
    }

    pub fn version(&self) -> Option<String> {
        self.get_str("version")
    }

    pub fn created_at(&self) -> Option<String> {
        self.get_str("created_at")
    }

    /// Fill `created_at` (now) and `version` when the caller left them out.
    pub fn with_defaults(mut self) -> Self {
        if !self.contains_key("created_at") {
            self.set("created_at", crate::document::now_isoformat());
        }
        if !self.contains_key("version") {
            self.set("version", DEFAULT_VERSION);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_yaml::Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(String, serde_yaml::Value)> for WorkspaceConfig {
    fn from_iter<I: IntoIterator<Item = (String, serde_yaml::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

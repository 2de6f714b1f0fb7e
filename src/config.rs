//! Application Configuration
//!
//! User-level settings for the `airic` binary: logging, the agent collaborator, and REPL
//! behavior. Layered from defaults, the global TOML file, and `AIRIC_*` environment
//! variables. Per-workspace settings live in `.airic/config.yaml` and are handled by
//! [`crate::workspace::WorkspaceConfig`] instead.

use crate::agent::AgentSettings;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod sources {
    pub mod env_vars;
    pub mod global_file;
}

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiricConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub agent: AgentSettings,

    #[serde(default)]
    pub repl: ReplConfig,
}

/// Interactive session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Identifier passed to the agent so it can keep per-user conversation state
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Command history file; defaults to ~/.airic/history/command_history.txt
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Documents opened automatically at startup, first match wins
    #[serde(default = "default_documents")]
    pub default_documents: Vec<String>,
}

fn default_user_id() -> String {
    "repl_user".to_string()
}

fn default_documents() -> Vec<String> {
    vec!["README.md".to_string(), "index.md".to_string()]
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            history_file: None,
            default_documents: default_documents(),
        }
    }
}

impl ReplConfig {
    /// Resolved history file location, if a home directory can be determined.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            directories::BaseDirs::new().map(|dirs| {
                dirs.home_dir()
                    .join(".airic")
                    .join("history")
                    .join("command_history.txt")
            })
        })
    }
}

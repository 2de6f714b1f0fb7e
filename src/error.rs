//! Error types for the Airic workspace manager.

use std::path::PathBuf;
use thiserror::Error;

/// Workspace discovery, validation, and config errors
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("No Airic workspace found in {} or any parent directory. Run `airic init` or /init to create one.", .start.display())]
    NotFound { start: PathBuf },

    #[error(
        "Invalid Airic workspace at {}:\n{}\nRun `airic init --force` or /init to repair the workspace structure.",
        .root.display(),
        format_problems(.problems)
    )]
    Validation {
        root: PathBuf,
        problems: Vec<String>,
    },

    #[error("Workspace I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse workspace config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize workspace config: {0}")]
    ConfigSerialize(#[source] serde_yaml::Error),
}

impl WorkspaceError {
    /// True for the validation family (missing or malformed structure), false for I/O failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Validation { .. })
    }
}

fn format_problems(problems: &[String]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Document load, save, and discovery errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read document {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory for document {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl DocumentError {
    /// The document path involved, if the error concerns a single file.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::CreateDir { path, .. } => {
                Some(path.as_path())
            }
            Self::InvalidPattern { .. } => None,
        }
    }
}

/// Staged initialization failures. Each variant renders with a stable prefix.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Permission denied when creating directories in {}", .dir.display())]
    PermissionDenied { dir: PathBuf },

    #[error("Error creating workspace directories: {0}")]
    Directories(#[source] std::io::Error),

    #[error("Error creating workspace configuration: {0}")]
    Config(String),

    #[error("Error creating template files: {0}")]
    Templates(#[source] std::io::Error),

    #[error("Unexpected error during workspace initialization: {0}")]
    Unexpected(String),
}

/// Agent collaborator errors
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// Network or model hiccup; retried with backoff
    #[error("Transient agent error: {0}")]
    Transient(String),

    #[error("Agent request failed: {0}")]
    Terminal(String),

    #[error("{0}")]
    NotConfigured(String),
}

impl AgentError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Umbrella error used at the CLI and REPL boundaries
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor, prompt, or external editor failure
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<dialoguer::Error> for ApiError {
    fn from(err: dialoguer::Error) -> Self {
        ApiError::Terminal(err.to_string())
    }
}

//! Workspace domain: on-disk layout, structural validation, config, and discovery.
//!
//! A workspace is any directory holding the `.airic` marker:
//!
//! ```text
//! <root>/.airic/config.yaml
//! <root>/.airic/meta/{agents,doctypes,workflows}/*.md
//! <root>/.airic/history/
//! ```

use crate::error::WorkspaceError;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

mod config;
mod context;
mod discovery;

pub use config::{WorkspaceConfig, DEFAULT_VERSION};
pub use context::{with_workspace, WorkspaceContext};
pub use discovery::{absolute_path, find_workspace_root};

/// Marker directory name
pub const WORKSPACE_DIR: &str = ".airic";
pub const CONFIG_FILE: &str = "config.yaml";
pub const META_DIR: &str = "meta";
pub const HISTORY_DIR: &str = "history";

/// Required directories relative to the workspace root, parents before children.
pub const REQUIRED_DIRS: &[&[&str]] = &[
    &[WORKSPACE_DIR],
    &[WORKSPACE_DIR, META_DIR],
    &[WORKSPACE_DIR, META_DIR, "agents"],
    &[WORKSPACE_DIR, META_DIR, "doctypes"],
    &[WORKSPACE_DIR, META_DIR, "workflows"],
    &[WORKSPACE_DIR, HISTORY_DIR],
];

/// Template libraries under `.airic/meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Agents,
    Doctypes,
    Workflows,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [Self::Agents, Self::Doctypes, Self::Workflows];

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Agents => "agents",
            Self::Doctypes => "doctypes",
            Self::Workflows => "workflows",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: OnceCell<WorkspaceConfig>,
}

impl Workspace {
    /// No I/O happens until a method needs the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn airic_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.airic_dir().join(META_DIR)
    }

    pub fn templates_dir(&self, kind: TemplateKind) -> PathBuf {
        self.meta_dir().join(kind.dir_name())
    }

    pub fn history_dir(&self) -> PathBuf {
        self.airic_dir().join(HISTORY_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.airic_dir().join(CONFIG_FILE)
    }

    /// Absolute paths of every required directory, parents first.
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        REQUIRED_DIRS
            .iter()
            .map(|parts| parts.iter().fold(self.root.clone(), |p, part| p.join(part)))
            .collect()
    }

    /// All required directories exist. Config is not checked.
    pub fn is_initialized(&self) -> bool {
        self.required_dirs().iter().all(|dir| dir.is_dir())
    }

    /// Every structural problem, one message each. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems: Vec<String> = REQUIRED_DIRS
            .iter()
            .zip(self.required_dirs())
            .filter(|(_, dir)| !dir.is_dir())
            .map(|(parts, _)| format!("Missing required directory: {}", parts.join("/")))
            .collect();

        if self.airic_dir().is_dir() && !self.config_path().is_file() {
            problems.push(format!(
                "Missing workspace configuration file: {}/{}",
                WORKSPACE_DIR, CONFIG_FILE
            ));
        }
        problems
    }

    /// Config, loaded on first access and cached for the lifetime of this value.
    /// A missing or unreadable file yields an empty config.
    pub fn config(&self) -> &WorkspaceConfig {
        self.config.get_or_init(|| match self.load_config() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Using empty workspace config");
                WorkspaceConfig::default()
            }
        })
    }

    /// Read the config file from disk, bypassing the cache.
    pub fn load_config(&self) -> Result<WorkspaceConfig, WorkspaceError> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(WorkspaceConfig::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| WorkspaceError::Io {
            path: path.clone(),
            source,
        })?;
        WorkspaceConfig::from_yaml(&raw).map_err(|source| WorkspaceError::ConfigParse { path, source })
    }

    /// Overwrite the config file and replace the cached value.
    pub fn save_config(&mut self, config: WorkspaceConfig) -> Result<(), WorkspaceError> {
        let path = self.config_path();
        let yaml = config.to_yaml().map_err(WorkspaceError::ConfigSerialize)?;
        std::fs::write(&path, yaml).map_err(|source| WorkspaceError::Io { path, source })?;
        self.config = OnceCell::from(config);
        Ok(())
    }

    /// Create every required directory (existing ones are fine) and write the config,
    /// filling `created_at` and `version` when absent.
    pub fn initialize(&mut self, config: WorkspaceConfig) -> Result<(), WorkspaceError> {
        for dir in self.required_dirs() {
            std::fs::create_dir_all(&dir)
                .map_err(|source| WorkspaceError::Io { path: dir, source })?;
        }
        self.save_config(config.with_defaults())?;
        debug!(root = %self.root.display(), "Workspace initialized");
        Ok(())
    }

    /// Config `name`, else the root directory name, else "airic".
    pub fn name(&self) -> String {
        self.config()
            .name()
            .or_else(|| {
                self.root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "airic".to_string())
    }

    /// Sorted stems of the `.md` templates of one kind.
    pub fn list_templates(&self, kind: TemplateKind) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.templates_dir(kind)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names
    }
}

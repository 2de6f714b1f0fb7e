//! Workspace initialization
//!
//! Populates a directory with the `.airic` layout, a config file, and the default
//! template documents. Directory, config, and template creation are all-or-nothing:
//! a failure in any of them removes what this call created before reporting which
//! stage failed. The root README is a courtesy and never fails the call.
//!
//! Templates are embedded in the binary at build time.

use crate::error::InitError;
use crate::workspace::{Workspace, WorkspaceConfig};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default templates, relative to `.airic/meta`
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (
        "agents/default.md",
        include_str!("../templates/agents/default.md"),
    ),
    ("agents/writer.md", include_str!("../templates/agents/writer.md")),
    (
        "doctypes/meeting_notes.md",
        include_str!("../templates/doctypes/meeting_notes.md"),
    ),
    (
        "doctypes/brainstorming.md",
        include_str!("../templates/doctypes/brainstorming.md"),
    ),
    (
        "workflows/document_review.md",
        include_str!("../templates/workflows/document_review.md"),
    ),
];

pub const DEFAULT_README_TITLE: &str = "Airic Workspace";
pub const DEFAULT_README_DESCRIPTION: &str =
    "An Airic workspace for document-driven AI collaboration";

/// Filesystem effects used by the initializer.
pub trait InitFilesystem {
    fn is_dir(&self, path: &Path) -> bool;
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    /// Must fail on a non-empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl InitFilesystem for OsFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }
}

/// Caller-supplied settings for the new workspace config
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Additional config keys, written as-is
    pub extra: WorkspaceConfig,
}

impl InitOptions {
    pub fn to_config(&self) -> WorkspaceConfig {
        let mut config = self.extra.clone();
        if let Some(name) = &self.name {
            config.set("name", name.as_str());
        }
        if let Some(description) = &self.description {
            config.set("description", description.as_str());
        }
        config
    }
}

/// Outcome of a successful initialization call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitReport {
    /// Nothing was written
    AlreadyInitialized { root: PathBuf },
    Created {
        root: PathBuf,
        directories: Vec<PathBuf>,
        files: Vec<PathBuf>,
        readme: Option<PathBuf>,
    },
}

impl InitReport {
    pub fn root(&self) -> &Path {
        match self {
            Self::AlreadyInitialized { root } | Self::Created { root, .. } => root,
        }
    }

    pub fn is_already_initialized(&self) -> bool {
        matches!(self, Self::AlreadyInitialized { .. })
    }

    /// Informational lines for display.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::AlreadyInitialized { .. } => vec!["Workspace already initialized".to_string()],
            Self::Created {
                directories,
                files,
                readme,
                ..
            } => {
                let mut messages = vec![format!(
                    "Created {} director{} and {} file{}",
                    directories.len(),
                    if directories.len() == 1 { "y" } else { "ies" },
                    files.len(),
                    if files.len() == 1 { "" } else { "s" },
                )];
                if let Some(readme) = readme {
                    messages.push(format!("Created {}", readme.display()));
                }
                messages
            }
        }
    }
}

/// Paths created by the current call, undone in reverse on failure.
struct CreatedPaths<'a, F: InitFilesystem> {
    fs: &'a F,
    directories: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl<'a, F: InitFilesystem> CreatedPaths<'a, F> {
    fn new(fs: &'a F) -> Self {
        Self {
            fs,
            directories: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Create `dir` (and parents), remembering it only if it did not exist before.
    fn create_dir(&mut self, dir: &Path) -> io::Result<()> {
        let existed = self.fs.is_dir(dir);
        self.fs.create_dir_all(dir)?;
        if !existed {
            self.directories.push(dir.to_path_buf());
        }
        Ok(())
    }

    /// Write `path`, remembering it only if the write succeeded and the file is new.
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        let existed = self.fs.exists(path);
        self.fs.write(path, contents)?;
        if !existed {
            self.files.push(path.to_path_buf());
        }
        Ok(())
    }

    /// Best effort: failures are logged and never replace the original error.
    fn roll_back(self) {
        for file in self.files.iter().rev() {
            match self.fs.remove_file(file) {
                Ok(()) => debug!(path = %file.display(), "Rollback: removed file"),
                Err(e) => warn!(path = %file.display(), error = %e, "Rollback: failed to remove file"),
            }
        }
        for dir in self.directories.iter().rev() {
            // Non-empty directories stay; remove_dir refuses them.
            match self.fs.remove_dir(dir) {
                Ok(()) => debug!(path = %dir.display(), "Rollback: removed directory"),
                Err(e) => debug!(path = %dir.display(), error = %e, "Rollback: left directory in place"),
            }
        }
    }

    fn into_parts(self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        (self.directories, self.files)
    }
}

/// Initializer over an injectable filesystem
pub struct Initializer<F: InitFilesystem = OsFilesystem> {
    fs: F,
}

impl Default for Initializer<OsFilesystem> {
    fn default() -> Self {
        Self::new(OsFilesystem)
    }
}

impl<F: InitFilesystem> Initializer<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Initialize `directory` unless it already is a workspace.
    pub fn initialize(
        &self,
        directory: &Path,
        options: &InitOptions,
    ) -> Result<InitReport, InitError> {
        let workspace = Workspace::new(directory);
        if workspace
            .required_dirs()
            .iter()
            .all(|dir| self.fs.is_dir(dir))
        {
            info!(root = %directory.display(), "Workspace already initialized");
            return Ok(InitReport::AlreadyInitialized {
                root: directory.to_path_buf(),
            });
        }
        self.populate(&workspace, options.to_config(), false)
    }

    /// Rewrite config and templates even on an initialized workspace. Existing config keys
    /// are kept unless `options` overrides them.
    pub fn reinitialize(
        &self,
        directory: &Path,
        options: &InitOptions,
    ) -> Result<InitReport, InitError> {
        let workspace = Workspace::new(directory);
        let mut config = workspace.load_config().unwrap_or_default();
        for (key, value) in options.to_config().iter() {
            config.set(key.clone(), value.clone());
        }
        self.populate(&workspace, config, true)
    }

    fn populate(
        &self,
        workspace: &Workspace,
        config: WorkspaceConfig,
        overwrite_templates: bool,
    ) -> Result<InitReport, InitError> {
        let root = workspace.root();
        if self.fs.exists(root) && !self.fs.is_dir(root) {
            return Err(InitError::Unexpected(format!(
                "{} exists and is not a directory",
                root.display()
            )));
        }

        let mut created = CreatedPaths::new(&self.fs);
        let config = config.with_defaults();

        if let Err(e) = self.stage_directories(workspace, &mut created) {
            created.roll_back();
            return Err(e);
        }
        if let Err(e) = self.stage_config(workspace, &config, &mut created) {
            created.roll_back();
            return Err(e);
        }
        if let Err(e) = self.stage_templates(workspace, overwrite_templates, &mut created) {
            created.roll_back();
            return Err(e);
        }

        let readme = self.write_readme(root, &config);
        let (directories, files) = created.into_parts();
        info!(
            root = %root.display(),
            directories = directories.len(),
            files = files.len(),
            "Workspace initialized"
        );
        Ok(InitReport::Created {
            root: root.to_path_buf(),
            directories,
            files,
            readme,
        })
    }

    fn stage_directories(
        &self,
        workspace: &Workspace,
        created: &mut CreatedPaths<'_, F>,
    ) -> Result<(), InitError> {
        let root = workspace.root();
        let mut dirs = vec![root.to_path_buf()];
        dirs.extend(workspace.required_dirs());
        for dir in dirs {
            created.create_dir(&dir).map_err(|e| match e.kind() {
                io::ErrorKind::PermissionDenied => InitError::PermissionDenied {
                    dir: root.to_path_buf(),
                },
                _ => InitError::Directories(e),
            })?;
        }
        Ok(())
    }

    fn stage_config(
        &self,
        workspace: &Workspace,
        config: &WorkspaceConfig,
        created: &mut CreatedPaths<'_, F>,
    ) -> Result<(), InitError> {
        let yaml = config
            .to_yaml()
            .map_err(|e| InitError::Config(e.to_string()))?;
        created
            .write_file(&workspace.config_path(), &yaml)
            .map_err(|e| InitError::Config(e.to_string()))
    }

    fn stage_templates(
        &self,
        workspace: &Workspace,
        overwrite: bool,
        created: &mut CreatedPaths<'_, F>,
    ) -> Result<(), InitError> {
        let meta_dir = workspace.meta_dir();
        for (relative, contents) in DEFAULT_TEMPLATES {
            let dest = relative.split('/').fold(meta_dir.clone(), |p, part| p.join(part));
            if !overwrite && self.fs.exists(&dest) {
                continue;
            }
            if let Some(parent) = dest.parent() {
                created.create_dir(parent).map_err(InitError::Templates)?;
            }
            created
                .write_file(&dest, contents)
                .map_err(InitError::Templates)?;
        }
        Ok(())
    }

    fn write_readme(&self, root: &Path, config: &WorkspaceConfig) -> Option<PathBuf> {
        let path = root.join("README.md");
        if self.fs.exists(&path) {
            return None;
        }
        let contents = readme_contents(config);
        match self.fs.write(&path, &contents) {
            Ok(()) => Some(path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error creating README.md");
                None
            }
        }
    }
}

fn readme_contents(config: &WorkspaceConfig) -> String {
    let name = config
        .name()
        .unwrap_or_else(|| DEFAULT_README_TITLE.to_string());
    let description = config
        .description()
        .unwrap_or_else(|| DEFAULT_README_DESCRIPTION.to_string());
    format!("# {}\n\n{}\n", name, description)
}

/// Initialize `directory` on the real filesystem.
pub fn initialize_workspace(
    directory: &Path,
    options: &InitOptions,
) -> Result<InitReport, InitError> {
    Initializer::default().initialize(directory, options)
}

//! Scoped acquisition of a validated workspace.

use super::discovery::{absolute_path, find_workspace_root};
use super::Workspace;
use crate::error::WorkspaceError;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// A workspace that passed validation. Holding one means the structure was complete at
/// acquisition time; nothing needs releasing when it is dropped.
#[derive(Debug)]
pub struct WorkspaceContext {
    workspace: Workspace,
}

impl WorkspaceContext {
    /// Use `path` as the root when given, otherwise discover upward from the cwd.
    pub fn acquire(path: Option<&Path>) -> Result<Self, WorkspaceError> {
        let root = match path {
            Some(path) => absolute_path(path),
            None => {
                let cwd = std::env::current_dir().map_err(|source| WorkspaceError::Io {
                    path: ".".into(),
                    source,
                })?;
                find_workspace_root(Some(cwd.as_path()))
                    .ok_or(WorkspaceError::NotFound { start: cwd })?
            }
        };

        let workspace = Workspace::new(root);
        let problems = workspace.validate();
        if !problems.is_empty() {
            return Err(WorkspaceError::Validation {
                root: workspace.root().to_path_buf(),
                problems,
            });
        }
        Ok(Self { workspace })
    }

    pub fn into_inner(self) -> Workspace {
        self.workspace
    }
}

impl Deref for WorkspaceContext {
    type Target = Workspace;

    fn deref(&self) -> &Workspace {
        &self.workspace
    }
}

impl DerefMut for WorkspaceContext {
    fn deref_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }
}

/// Run `f` against a validated workspace.
pub fn with_workspace<T>(
    path: Option<&Path>,
    f: impl FnOnce(&mut Workspace) -> T,
) -> Result<T, WorkspaceError> {
    let mut ctx = WorkspaceContext::acquire(path)?;
    Ok(f(&mut ctx))
}

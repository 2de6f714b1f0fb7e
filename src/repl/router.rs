//! Input routing and document path resolution. Pure: no I/O.

use super::commands::{lookup, CommandKind};
use crate::document::WikiLink;
use std::path::{Path, PathBuf};

pub const COMMAND_PREFIX: char = '/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Blank line
    Empty,
    Command { kind: CommandKind, args: String },
    /// Slash-prefixed but not in the command table (lowercased)
    Unknown(String),
    /// Free text for the agent
    Prompt(String),
}

/// Classify one input line. The line is trimmed once; a command's arguments are
/// everything after the first whitespace run, passed through verbatim.
pub fn route(line: &str) -> Route {
    let line = line.trim();
    if line.is_empty() {
        return Route::Empty;
    }
    let Some(rest) = line.strip_prefix(COMMAND_PREFIX) else {
        return Route::Prompt(line.to_string());
    };

    let (name, args) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim_start()),
        None => (rest, ""),
    };
    let name = name.to_lowercase();
    match lookup(&name) {
        Some(kind) => Route::Command {
            kind,
            args: args.to_string(),
        },
        None => Route::Unknown(name),
    }
}

/// Where an `/open` argument points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    pub path: PathBuf,
    /// Typed as `[[...]]`; missing targets of this kind are created on open
    pub from_wikilink: bool,
}

/// Resolve an `/open` argument.
///
/// `[[Target]]` maps to `Target.md`: a leading `/` anchors it at the workspace root,
/// otherwise it sits next to the active document (or at the root when none is open).
/// Plain relative paths are joined onto the root; absolute paths pass through.
pub fn resolve_document_path(
    input: &str,
    workspace_root: &Path,
    active_document: Option<&Path>,
) -> Option<DocumentTarget> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(link) = WikiLink::parse_exact(input) {
        let anchored = link.target.starts_with('/');
        let file_name = format!("{}.md", link.target.trim_start_matches('/'));
        let base = match (anchored, active_document.and_then(Path::parent)) {
            (false, Some(parent)) => parent.to_path_buf(),
            _ => workspace_root.to_path_buf(),
        };
        return Some(DocumentTarget {
            path: base.join(file_name),
            from_wikilink: true,
        });
    }

    let path = Path::new(input);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    };
    Some(DocumentTarget {
        path,
        from_wikilink: false,
    })
}

//! Tab completion. Never fails: anything that cannot be resolved contributes nothing.

use super::commands::command_names;
use std::path::{Path, PathBuf};

const OPEN_PREFIX: &str = "/open ";

/// Snapshot of session state the completer needs
#[derive(Debug, Clone, Default)]
pub struct CompletionContext {
    pub workspace_root: Option<PathBuf>,
    /// Sorted unique `[[...]]` forms from the active document body
    pub wikilinks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Command,
    WikiLink,
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text that replaces the input from `Completions::start`
    pub replacement: String,
    pub display: String,
    pub kind: CandidateKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    /// Byte offset in the line where replacement begins
    pub start: usize,
    pub candidates: Vec<Candidate>,
}

/// Candidates for the text before the cursor.
pub fn complete(line: &str, ctx: &CompletionContext) -> Completions {
    if let Some(rest) = line.strip_prefix(OPEN_PREFIX) {
        let current = rest.trim_start();
        let start = line.len() - current.len();
        let Some(root) = ctx.workspace_root.as_deref() else {
            return Completions {
                start,
                candidates: Vec::new(),
            };
        };
        let mut candidates = wikilink_candidates(current, &ctx.wikilinks);
        let offered: Vec<&str> = candidates.iter().map(|c| c.replacement.as_str()).collect();
        let files = path_candidates(current, root, &offered);
        candidates.extend(files);
        return Completions { start, candidates };
    }

    if let Some(word) = line.strip_prefix('/') {
        if !word.contains(char::is_whitespace) {
            let lower = word.to_lowercase();
            let candidates = command_names()
                .into_iter()
                .filter(|name| name.starts_with(&lower))
                .map(|name| Candidate {
                    replacement: name.to_string(),
                    display: name.to_string(),
                    kind: CandidateKind::Command,
                })
                .collect();
            return Completions {
                start: 1,
                candidates,
            };
        }
    }

    Completions {
        start: line.len(),
        candidates: Vec::new(),
    }
}

fn wikilink_candidates(current: &str, wikilinks: &[String]) -> Vec<Candidate> {
    let lower = current.to_lowercase();
    wikilinks
        .iter()
        .filter(|link| link.to_lowercase().starts_with(&lower))
        .map(|link| Candidate {
            replacement: link.clone(),
            display: link.clone(),
            kind: CandidateKind::WikiLink,
        })
        .collect()
}

/// Entries of the directory implied by what was typed so far.
///
/// Hidden entries only show up when the partial name itself starts with `.`. Markdown
/// files whose `[[stem]]` is in `offered` are left out. A leading `/` anchors at the
/// workspace root, and replacements are then written relative to it.
fn path_candidates(current: &str, root: &Path, offered: &[&str]) -> Vec<Candidate> {
    let current = current.trim_start_matches('/');
    let (typed_dir, partial) = match current.rsplit_once('/') {
        Some((dir, partial)) => (Some(dir), partial),
        None => (None, current),
    };

    let Ok(canonical_root) = dunce::canonicalize(root) else {
        return Vec::new();
    };
    let base = match typed_dir {
        Some(dir) => canonical_root.join(dir),
        None => canonical_root.clone(),
    };
    let Ok(base) = dunce::canonicalize(&base) else {
        return Vec::new();
    };
    if !base.starts_with(&canonical_root) || !base.is_dir() {
        return Vec::new();
    }
    let Ok(entries) = std::fs::read_dir(&base) else {
        return Vec::new();
    };

    let show_hidden = partial.starts_with('.');
    let mut found: Vec<(String, bool)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(partial) || (name.starts_with('.') && !show_hidden) {
                return None;
            }
            let is_dir = entry.path().is_dir();
            if !is_dir {
                let path = entry.path();
                let is_md = path.extension().is_some_and(|ext| ext == "md");
                if is_md {
                    let stem = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let link = format!("[[{}]]", stem);
                    if offered.contains(&link.as_str()) {
                        return None;
                    }
                }
            }
            Some((name, is_dir))
        })
        .collect();
    found.sort();

    found
        .into_iter()
        .map(|(name, is_dir)| {
            let display = match typed_dir {
                Some(dir) => format!("{}/{}", dir, name),
                None => name,
            };
            let (replacement, kind) = if is_dir {
                (format!("{}/", display), CandidateKind::Directory)
            } else {
                (display.clone(), CandidateKind::File)
            };
            Candidate {
                replacement,
                display,
                kind,
            }
        })
        .collect()
}

//! Document discovery: glob-matched Markdown files under a directory.

use super::Document;
use crate::error::DocumentError;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_PATTERN: &str = "*.md";

/// Glob over `/`-separated relative paths.
///
/// `*` and `?` stay within one path component, `**/` spans zero or more directories,
/// and every other character is literal.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
    recursive: bool,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self, DocumentError> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|source| {
            DocumentError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            recursive: pattern.contains('/') || pattern.contains("**"),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, relative: &str) -> bool {
        self.regex.is_match(relative)
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Paths under `root` whose relative path matches `pattern`, sorted.
/// Hidden entries (including the `.airic` marker directory) are never visited.
pub fn find_document_paths(root: &Path, pattern: &GlobPattern) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if !pattern.recursive {
        walker = walker.max_depth(1);
    }

    let mut paths = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry during document discovery");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(rel) = relative_slash_path(root, entry.path()) {
            if pattern.matches(&rel) {
                paths.push(entry.into_path());
            }
        }
    }
    paths
}

/// Load every document under `root` matching `pattern` (default `*.md`).
/// Files that fail to load are skipped with a warning.
pub fn find_documents(root: &Path, pattern: Option<&str>) -> Result<Vec<Document>, DocumentError> {
    let pattern = GlobPattern::new(pattern.unwrap_or(DEFAULT_PATTERN))?;
    let documents = find_document_paths(root, &pattern)
        .into_iter()
        .filter_map(|path| match Document::load(&path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(error = %e, "Skipping document");
                None
            }
        })
        .collect();
    Ok(documents)
}

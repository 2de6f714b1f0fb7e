//! Document Model
//!
//! A Markdown file with optional YAML frontmatter. The frontmatter becomes the document's
//! metadata mapping and everything after it is the body. Two metadata keys are reserved:
//! `doctype` (semantic category) and `agent` (which AI persona handles the document).

use crate::error::DocumentError;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod discovery;
pub mod frontmatter;
pub mod wikilink;

pub use discovery::{find_documents, GlobPattern};
pub use frontmatter::{value_to_string, Metadata};
pub use wikilink::WikiLink;

/// Placeholder body line written by [`Document::create_empty`].
pub const PLACEHOLDER_TEXT: &str = "Your content here...";

#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    metadata: Metadata,
    body: String,
    /// Serialized form; reset by every mutation and rebuilt on the next read.
    content: OnceCell<String>,
}

impl Document {
    /// Read and parse the file at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path).map_err(|source| DocumentError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "Loaded document");
        Ok(Self::from_content(path, raw))
    }

    /// Parse literal content without touching the filesystem.
    pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        let (metadata, body) = frontmatter::split(&content);
        Self {
            path: path.into(),
            metadata,
            body,
            content: OnceCell::from(content),
        }
    }

    /// Build a new in-memory document with default metadata and a templated body.
    ///
    /// The title defaults to the file stem with underscores turned into spaces and
    /// title-cased. Caller metadata is merged over the defaults (`created_at`, `title`).
    pub fn create_empty(
        path: impl Into<PathBuf>,
        metadata: Option<Metadata>,
        title: Option<&str>,
    ) -> Self {
        let path = path.into();
        let title = match title {
            Some(title) => title.to_string(),
            None => default_title(&path),
        };

        let mut merged = Metadata::new();
        merged.insert(
            "created_at".to_string(),
            serde_yaml::Value::String(now_isoformat()),
        );
        merged.insert("title".to_string(), serde_yaml::Value::String(title.clone()));
        if let Some(extra) = metadata {
            merged.extend(extra);
        }

        Self {
            path,
            metadata: merged,
            body: format!("# {}\n\n{}\n", title, PLACEHOLDER_TEXT),
            content: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including extension, e.g. `notes.md`.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `title` metadata when present, otherwise the file stem.
    pub fn title(&self) -> String {
        self.metadata
            .get("title")
            .and_then(value_to_string)
            .unwrap_or_else(|| self.stem())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn doctype(&self) -> Option<String> {
        self.metadata.get("doctype").and_then(value_to_string)
    }

    pub fn agent(&self) -> Option<String> {
        self.metadata.get("agent").and_then(value_to_string)
    }

    /// Full serialized text: frontmatter block (if any metadata) followed by the body.
    pub fn content(&self) -> &str {
        self.content
            .get_or_init(|| frontmatter::render(&self.metadata, &self.body))
    }

    /// Overwrite the file with the serialized content, creating parent directories.
    pub fn save(&self) -> Result<(), DocumentError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| DocumentError::CreateDir {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        std::fs::write(&self.path, self.content()).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Saved document");
        Ok(())
    }

    /// Shallow merge: keys in `patch` overwrite existing keys.
    pub fn update_metadata(&mut self, patch: Metadata) {
        self.metadata.extend(patch);
        self.content = OnceCell::new();
    }

    pub fn update_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.content = OnceCell::new();
    }

    /// One message per missing field; empty means valid.
    pub fn validate_metadata(&self, required_fields: &[&str]) -> Vec<String> {
        required_fields
            .iter()
            .filter(|field| !self.metadata.contains_key(**field))
            .map(|field| format!("Missing required metadata field: {}", field))
            .collect()
    }

    pub fn wikilinks(&self) -> Vec<WikiLink> {
        wikilink::find_wikilinks(&self.body)
    }
}

fn default_title(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    title_case(&stem.replace('_', " "))
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Local time in the `YYYY-MM-DDTHH:MM:SS.ffffff` form used for `created_at`.
pub(crate) fn now_isoformat() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

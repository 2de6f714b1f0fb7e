//! Frontmatter split/render.
//!
//! Content that starts with `---` has its metadata between that delimiter and the next
//! `---` occurrence. No closing delimiter means there is no frontmatter at all.

use std::collections::BTreeMap;
use tracing::warn;

pub const DELIMITER: &str = "---";

/// Document metadata. Ordered so re-serialization is stable.
pub type Metadata = BTreeMap<String, serde_yaml::Value>;

/// Split raw content into (metadata, body). Never fails; malformed YAML yields empty metadata.
pub fn split(content: &str) -> (Metadata, String) {
    if !content.starts_with(DELIMITER) {
        return (Metadata::new(), content.to_string());
    }

    let rest = &content[DELIMITER.len()..];
    let Some(end) = rest.find(DELIMITER) else {
        return (Metadata::new(), content.to_string());
    };

    let yaml = rest[..end].trim();
    let body = rest[end + DELIMITER.len()..].trim().to_string();
    (parse_metadata(yaml), body)
}

fn parse_metadata(yaml: &str) -> Metadata {
    if yaml.is_empty() {
        return Metadata::new();
    }
    match serde_yaml::from_str::<serde_yaml::Value>(yaml) {
        Ok(serde_yaml::Value::Mapping(mapping)) => mapping
            .into_iter()
            .filter_map(|(key, value)| value_to_string(&key).map(|k| (k, value)))
            .collect(),
        Ok(serde_yaml::Value::Null) => Metadata::new(),
        Ok(_) => {
            warn!("Frontmatter is not a mapping, ignoring it");
            Metadata::new()
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse frontmatter YAML, ignoring it");
            Metadata::new()
        }
    }
}

/// `---\n<yaml>---\n\n<body>`, or just the body when there is no metadata.
pub fn render(metadata: &Metadata, body: &str) -> String {
    if metadata.is_empty() {
        return body.to_string();
    }
    match serde_yaml::to_string(metadata) {
        Ok(yaml) => format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{body}"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize frontmatter, writing body only");
            body.to_string()
        }
    }
}

/// Display form of a scalar YAML value. Sequences and mappings have none.
pub fn value_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Tagged(tagged) => value_to_string(&tagged.value),
        serde_yaml::Value::Null | serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}

//! WikiLinks: `[[Target]]` and `[[Target|Display]]` references between documents.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

static WIKILINK_RE: OnceLock<Regex> = OnceLock::new();
static WHOLE_WIKILINK_RE: OnceLock<Regex> = OnceLock::new();

const INVALID_TARGET_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

fn wikilink_regex() -> &'static Regex {
    WIKILINK_RE.get_or_init(|| Regex::new(r"\[\[(.+?)\]\]").expect("valid wikilink regex"))
}

fn whole_wikilink_regex() -> &'static Regex {
    WHOLE_WIKILINK_RE.get_or_init(|| Regex::new(r"^\[\[(.+)\]\]$").expect("valid wikilink regex"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    /// Link target, e.g. `Notes` or `/projects/Plan`
    pub target: String,
    /// Optional display text after `|`
    pub display: Option<String>,
}

impl WikiLink {
    /// Split the inner text of a link on the first `|`.
    pub fn parse_inner(inner: &str) -> Self {
        match inner.split_once('|') {
            Some((target, display)) => Self {
                target: target.trim().to_string(),
                display: Some(display.trim().to_string()),
            },
            None => Self {
                target: inner.trim().to_string(),
                display: None,
            },
        }
    }

    /// Parse input that is exactly one `[[...]]` link and nothing else.
    pub fn parse_exact(input: &str) -> Option<Self> {
        whole_wikilink_regex()
            .captures(input.trim())
            .and_then(|caps| caps.get(1))
            .map(|inner| Self::parse_inner(inner.as_str()))
    }

    /// Relative document path the link points at: `<target>.md`.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.target)
    }
}

/// Every link in `text`, in order of appearance.
pub fn find_wikilinks(text: &str) -> Vec<WikiLink> {
    wikilink_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|inner| WikiLink::parse_inner(inner.as_str()))
        .collect()
}

/// Sorted, de-duplicated bracketed forms (`[[Target]]`) found in `text`.
pub fn unique_wikilinks(text: &str) -> Vec<String> {
    wikilink_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|inner| format!("[[{}]]", inner.as_str().trim()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One message per malformed link; empty means every link is usable.
pub fn validate_wikilinks(text: &str) -> Vec<String> {
    let mut problems = Vec::new();
    for link in find_wikilinks(text) {
        if link.target.is_empty() {
            problems.push("Empty WikiLink target".to_string());
        } else if let Some(bad) = link.target.chars().find(|c| INVALID_TARGET_CHARS.contains(c)) {
            problems.push(format!(
                "Invalid character '{}' in WikiLink target: {}",
                bad, link.target
            ));
        }
    }
    problems
}

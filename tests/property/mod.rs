//! Property-based tests for document parsing and path resolution

mod frontmatter_roundtrip;
mod wikilink_resolution;

//! Property-based tests for frontmatter parsing and rendering

use airic::document::{Document, Metadata};
use proptest::prelude::*;

fn metadata_strategy() -> impl Strategy<Value = Metadata> {
    prop::collection::btree_map("k[a-z_]{0,8}", "x[a-z0-9 ]{0,15}[a-z0-9]", 0..6).prop_map(
        |map| {
            map.into_iter()
                .map(|(k, v)| (k, serde_yaml::Value::String(v)))
                .collect()
        },
    )
}

fn body_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,#\n]{0,120}"
}

/// Serialized documents parse back to the same metadata and trimmed body
#[test]
fn test_render_then_parse_preserves_document() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(metadata_strategy(), body_strategy()), |(metadata, body)| {
            let mut original = Document::from_content("doc.md", "");
            original.update_metadata(metadata.clone());
            original.update_body(body.clone());

            let parsed = Document::from_content("doc.md", original.content().to_string());
            prop_assert_eq!(parsed.metadata(), &metadata);
            if metadata.is_empty() {
                prop_assert_eq!(parsed.body(), body.as_str());
            } else {
                prop_assert_eq!(parsed.body(), body.trim());
            }
            Ok(())
        })
        .unwrap();
}

proptest! {
    /// Parsing never panics, whatever the input
    #[test]
    fn test_parse_arbitrary_content(content in "(---\n)?[^\u{0}]{0,200}") {
        let doc = Document::from_content("any.md", content.clone());
        if !content.starts_with("---") {
            prop_assert!(doc.metadata().is_empty());
            prop_assert_eq!(doc.body(), content.as_str());
        }
    }

    /// Saving and re-reading is stable after the first normalization
    #[test]
    fn test_serialization_is_idempotent(metadata in metadata_strategy(), body in body_strategy()) {
        let mut doc = Document::from_content("doc.md", "");
        doc.update_metadata(metadata);
        doc.update_body(body);

        let once = Document::from_content("doc.md", doc.content().to_string());
        let twice = Document::from_content("doc.md", once.content().to_string());
        prop_assert_eq!(once.content(), twice.content());
    }
}

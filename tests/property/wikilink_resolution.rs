//! Property-based tests for WikiLink extraction and document path resolution

use airic::document::wikilink::{find_wikilinks, unique_wikilinks};
use airic::repl::{resolve_document_path, route, Route};
use proptest::prelude::*;
use std::path::Path;

fn target_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,15}[A-Za-z0-9]"
}

proptest! {
    /// Every embedded link is found, in order, with its display text split off
    #[test]
    fn test_links_are_extracted_in_order(
        targets in prop::collection::vec(target_strategy(), 1..6),
        filler in "[a-z ]{0,10}",
    ) {
        let text: String = targets
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{filler}[[{t}|label {i}]]"))
            .collect();
        let links = find_wikilinks(&text);
        prop_assert_eq!(links.len(), targets.len());
        for (link, target) in links.iter().zip(&targets) {
            prop_assert_eq!(&link.target, target);
        }
    }

    /// Unique links come back sorted without duplicates
    #[test]
    fn test_unique_links_sorted_and_deduplicated(targets in prop::collection::vec(target_strategy(), 0..8)) {
        let text: String = targets.iter().map(|t| format!("[[{t}]] ")).collect();
        let unique = unique_wikilinks(&text);
        let mut expected: Vec<String> = targets.iter().map(|t| format!("[[{t}]]")).collect();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(unique, expected);
    }

    /// `[[Target]]` resolves beside the active document, `[[/Target]]` at the root
    #[test]
    fn test_wikilink_paths(target in target_strategy(), dir in "[a-z]{1,8}") {
        let root = Path::new("/ws");
        let active = root.join(&dir).join("current.md");

        let relative = resolve_document_path(&format!("[[{target}]]"), root, Some(active.as_path())).unwrap();
        prop_assert!(relative.from_wikilink);
        prop_assert_eq!(relative.path, root.join(&dir).join(format!("{target}.md")));

        let anchored = resolve_document_path(&format!("[[/{target}]]"), root, Some(active.as_path())).unwrap();
        prop_assert_eq!(anchored.path, root.join(format!("{target}.md")));

        let no_active = resolve_document_path(&format!("[[{target}]]"), root, None).unwrap();
        prop_assert_eq!(no_active.path, root.join(format!("{target}.md")));
    }

    /// Text without the command prefix is always a prompt, trimmed
    #[test]
    fn test_plain_text_routes_to_prompt(text in "[A-Za-z0-9][A-Za-z0-9 ?!.]{0,40}") {
        prop_assert_eq!(route(&format!("  {text}  ")), Route::Prompt(text.trim().to_string()));
    }
}

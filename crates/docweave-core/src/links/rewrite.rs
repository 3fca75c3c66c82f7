//! Link rewriting for migrated documents.
//!
//! The two-phase design that keeps the document graph consistent across a
//! wholesale rename: each link is *resolved* under the document's original
//! identity (where it points is a tree identity, stable in the rename
//! table), then *respelled* relative to the document's new containing
//! directory (how it is spelled changes whenever either endpoint moves).

use crate::identity::FileIdentity;
use crate::links::extract::{is_excluded, scan, LinkOccurrence};
use crate::links::resolve::{resolve, Resolution};
use crate::rename::RenameTable;
use tracing::debug;

/// Rewrite every eligible link in `text`.
///
/// `original` is the document's identity in the source tree, `renamed` its
/// identity in the migrated tree. Excluded targets, targets that do not
/// resolve inside the tree, and targets absent from the rename table are
/// left byte-for-byte untouched; the rewriter never fabricates a guess.
pub fn rewrite_document(
    text: &str,
    original: &FileIdentity,
    renamed: &FileIdentity,
    table: &RenameTable,
) -> String {
    let occurrences = scan(text);
    if occurrences.is_empty() {
        return text.to_string();
    }

    let new_parent = renamed.parent_dir();
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for occurrence in occurrences {
        if let Some(new_target) = rewritten_target(&occurrence, original, new_parent, table) {
            output.push_str(&text[cursor..occurrence.span.start]);
            let marker = if occurrence.is_image { "!" } else { "" };
            output.push_str(marker);
            output.push('[');
            output.push_str(occurrence.label);
            output.push_str("](");
            output.push_str(&new_target);
            output.push(')');
            cursor = occurrence.span.end;
        }
    }

    output.push_str(&text[cursor..]);
    output
}

/// The respelled target for one occurrence, or `None` to leave it alone.
fn rewritten_target(
    occurrence: &LinkOccurrence<'_>,
    original: &FileIdentity,
    new_parent: &str,
    table: &RenameTable,
) -> Option<String> {
    if is_excluded(occurrence.target, occurrence.is_image) {
        return None;
    }

    let decoded = FileIdentity::decode_target(occurrence.target);
    let identity = match resolve(original, &decoded) {
        Resolution::Resolved(identity) => identity,
        Resolution::OutsideTree | Resolution::Empty => {
            debug!("Leaving {} untouched in {}: outside tree", occurrence.target, original);
            return None;
        }
    };

    let Some(mapped) = table.lookup(&identity) else {
        debug!("Leaving {} untouched in {}: not in rename table", occurrence.target, original);
        return None;
    };
    Some(mapped.relative_from(new_parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FileIndex;
    use std::fs;
    use tempfile::TempDir;

    /// Build a rename table over a scratch tree containing `files`.
    fn table_for(files: &[&str]) -> RenameTable {
        let temp = TempDir::new().unwrap();
        for file in files {
            let path = temp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        let index = FileIndex::build(temp.path()).unwrap();
        RenameTable::build(&index)
    }

    #[test]
    fn test_rewrites_renamed_sibling() {
        let table = table_for(&["docs/a/x.md", "docs/img 1.png"]);
        let original = FileIdentity::new("docs/a/x.md");
        let renamed = FileIdentity::new("docs/a/x.md");

        let rewritten = rewrite_document("![](../img 1.png)", &original, &renamed, &table);
        assert_eq!(rewritten, "![](../img-1.png)");
    }

    #[test]
    fn test_rewrites_encoded_target() {
        let table = table_for(&["docs/a/x.md", "docs/img 1.png"]);
        let original = FileIdentity::new("docs/a/x.md");
        let renamed = FileIdentity::new("docs/a/x.md");

        let rewritten = rewrite_document("[img](../img%201.png)", &original, &renamed, &table);
        assert_eq!(rewritten, "[img](../img-1.png)");
    }

    #[test]
    fn test_document_move_respells_unrenamed_target() {
        // The document's own directory is sanitized; the target keeps its
        // name but the spelling must follow the document's new location.
        let table = table_for(&["My Notes/x.md", "assets/logo.png"]);
        let original = FileIdentity::new("My Notes/x.md");
        let renamed = FileIdentity::new("My-Notes/x.md");

        let rewritten = rewrite_document("[l](../assets/logo.png)", &original, &renamed, &table);
        assert_eq!(rewritten, "[l](../assets/logo.png)");
    }

    #[test]
    fn test_excluded_targets_untouched() {
        let table = table_for(&["docs/x.md"]);
        let original = FileIdentity::new("docs/x.md");
        let renamed = FileIdentity::new("docs/x.md");

        let text = "[a](https://example.com) [b](#top) [c](/abs.md) [d](mailto:x@y.z)";
        assert_eq!(rewrite_document(text, &original, &renamed, &table), text);
    }

    #[test]
    fn test_unmapped_target_untouched() {
        let table = table_for(&["docs/x.md"]);
        let original = FileIdentity::new("docs/x.md");
        let renamed = FileIdentity::new("docs/x.md");

        let text = "[gone](missing file.md)";
        assert_eq!(rewrite_document(text, &original, &renamed, &table), text);
    }

    #[test]
    fn test_outside_tree_target_untouched() {
        let table = table_for(&["docs/x.md"]);
        let original = FileIdentity::new("docs/x.md");
        let renamed = FileIdentity::new("docs/x.md");

        let text = "[up](../../escape.md)";
        assert_eq!(rewrite_document(text, &original, &renamed, &table), text);
    }

    #[test]
    fn test_surrounding_text_preserved() {
        let table = table_for(&["a b.md", "x.md"]);
        let original = FileIdentity::new("x.md");
        let renamed = FileIdentity::new("x.md");

        let text = "before [go](a b.md) middle ![](a b.md) after";
        let rewritten = rewrite_document(text, &original, &renamed, &table);
        assert_eq!(rewritten, "before [go](a-b.md) middle ![](a-b.md) after");
    }

    #[test]
    fn test_case_insensitive_table_fallback() {
        let table = table_for(&["Docs/Guide One.md", "x.md"]);
        let original = FileIdentity::new("x.md");
        let renamed = FileIdentity::new("x.md");

        let rewritten = rewrite_document("[g](docs/guide one.md)", &original, &renamed, &table);
        assert_eq!(rewritten, "[g](Docs/Guide-One.md)");
    }
}

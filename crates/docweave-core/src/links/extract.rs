//! Link scanning over raw document text.
//!
//! Documents are treated as text, not parsed into an AST. Two syntactic
//! forms are recognized: inline links `[text](target)` with non-empty text,
//! and image links `![text](target)` whose text may be empty. Nothing else
//! (reference-style links, HTML anchors, autolinks) is a link here.

use crate::identity::FileIdentity;
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::LazyLock;

/// Matches `[label](target)` with an optional leading `!` image marker.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Schemes and prefixes outside this engine's authority for any link.
const EXCLUDED_PREFIXES: &[&str] = &["http://", "https://", "#", "/", "mailto:"];

/// One link occurrence in a document, in textual order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence<'a> {
    /// True for `![..](..)` image links.
    pub is_image: bool,
    /// The bracketed label, as written.
    pub label: &'a str,
    /// The raw target, as written (whitespace-trimmed, not decoded).
    pub target: &'a str,
    /// Byte span of the whole occurrence in the source text.
    pub span: Range<usize>,
}

/// Scan a document's text for link occurrences, in order.
///
/// An occurrence is recognized when it is an image link, or an inline link
/// with a non-empty label.
pub fn scan(text: &str) -> Vec<LinkOccurrence<'_>> {
    LINK_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let is_image = !caps.get(1)?.as_str().is_empty();
            let label = caps.get(2)?.as_str();
            if !is_image && label.is_empty() {
                return None;
            }
            Some(LinkOccurrence {
                is_image,
                label,
                target: caps.get(3)?.as_str().trim(),
                span: whole.range(),
            })
        })
        .collect()
}

/// True when a target is outside this engine's authority: external URLs,
/// in-page anchors, root-absolute paths, mail addresses, and (for image
/// targets) inline data URIs. Excluded targets are never resolved,
/// rewritten, or reported broken.
pub fn is_excluded(target: &str, is_image: bool) -> bool {
    if EXCLUDED_PREFIXES.iter().any(|p| target.starts_with(p)) {
        return true;
    }
    is_image && target.starts_with("data:")
}

/// The distinct, decoded, non-excluded link targets of a document.
pub fn extract_targets(text: &str) -> BTreeSet<String> {
    scan(text)
        .into_iter()
        .filter(|occ| !is_excluded(occ.target, occ.is_image))
        .map(|occ| FileIdentity::decode_target(occ.target).into_owned())
        .collect()
}

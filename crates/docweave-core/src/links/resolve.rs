//! Lexical resolution of link targets against their containing document.
//!
//! Resolution never touches the filesystem: it is pure path algebra over
//! the containing document's identity and the decoded target. Callers
//! cross-check the result against a [`crate::index::FileIndex`] separately,
//! which is what lets the same resolver serve both the auditor (is this a
//! known file?) and the rewriter (map it through a rename table).

use crate::identity::FileIdentity;

/// Typed outcome of resolving a raw target.
///
/// Distinguishing "ascended past the tree root" from "nothing usable"
/// lets callers report the two differently; neither is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target names this identity within the tree.
    Resolved(FileIdentity),
    /// Normalization ascended past the tree root anchor.
    OutsideTree,
    /// The target normalizes to nothing (e.g. `.` or an empty string).
    Empty,
}

impl Resolution {
    /// The resolved identity, if any.
    pub fn resolved(self) -> Option<FileIdentity> {
        match self {
            Resolution::Resolved(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Resolve a decoded raw target relative to the parent directory of the
/// document that contains it.
///
/// `.` segments are dropped, `..` pops one segment; popping with nothing
/// left means the target points outside the tree.
pub fn resolve(document: &FileIdentity, target: &str) -> Resolution {
    let normalized = target.replace('\\', "/");

    let mut segments: Vec<&str> = document
        .parent_dir()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    for part in normalized.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Resolution::OutsideTree;
                }
            }
            part => segments.push(part),
        }
    }

    if segments.is_empty() {
        Resolution::Empty
    } else {
        Resolution::Resolved(FileIdentity::new(segments.join("/")))
    }
}

//! Immutable index of every file identity under a tree root.
//!
//! Built once per run by [`FileIndex::build`]; never mutated afterward.
//! Reruns rebuild it from scratch. The index owns two lookup structures:
//! the canonical sorted set and a lowercase-keyed map derived from it once,
//! so case-insensitive fallback lookups never re-derive keys.

use crate::config::AuditConfig;
use crate::error::{DocweaveError, Result};
use crate::identity::FileIdentity;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A file the index walk could not take in, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSkip {
    /// Path as reported by the walk.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// The set of all file identities present under a root at run start.
#[derive(Debug)]
pub struct FileIndex {
    root: PathBuf,
    identities: BTreeSet<FileIdentity>,
    lower: HashMap<String, FileIdentity>,
    skipped: Vec<IndexSkip>,
}

impl FileIndex {
    /// Walk `root` recursively and index every regular file below it.
    ///
    /// Fatal only when the root is missing or not a directory. Entries that
    /// cannot be listed or whose names are not valid UTF-8 are skipped with
    /// a warning and recorded in [`FileIndex::skipped`].
    pub fn build(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.exists() {
            return Err(DocweaveError::DirectoryNotFound(root));
        }
        if !root.is_dir() {
            return Err(DocweaveError::NotADirectory(root));
        }

        let mut identities = BTreeSet::new();
        let mut skipped = Vec::new();

        for entry in WalkDir::new(&root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!("Skipping unreadable entry {}: {}", path.display(), err);
                    skipped.push(IndexSkip {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            // strip_prefix cannot fail for entries produced by this walk
            let relative = match entry.path().strip_prefix(&root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };

            match FileIdentity::from_relative_path(relative) {
                Some(identity) => {
                    identities.insert(identity);
                }
                None => {
                    warn!("Skipping non-UTF-8 path {}", entry.path().display());
                    skipped.push(IndexSkip {
                        path: entry.path().to_path_buf(),
                        reason: "path is not valid UTF-8".to_string(),
                    });
                }
            }
        }

        // First entry wins on case collisions; canonical storage stays
        // case-sensitive, this map is lookup-only.
        let mut lower = HashMap::with_capacity(identities.len());
        for identity in &identities {
            lower
                .entry(identity.to_lowercase_key())
                .or_insert_with(|| identity.clone());
        }

        debug!(
            "Indexed {} files under {} ({} skipped)",
            identities.len(),
            root.display(),
            skipped.len()
        );

        Ok(Self {
            root,
            identities,
            lower,
            skipped,
        })
    }

    /// The tree root this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Exact membership check against canonical identities.
    pub fn contains(&self, identity: &FileIdentity) -> bool {
        self.identities.contains(identity)
    }

    /// Case-insensitive fallback lookup. Returns the canonical identity.
    pub fn get_case_insensitive(&self, identity: &FileIdentity) -> Option<&FileIdentity> {
        self.lower.get(&identity.to_lowercase_key())
    }

    /// Iterate all identities in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &FileIdentity> {
        self.identities.iter()
    }

    /// Iterate the identities of documents (files scanned for links).
    pub fn documents(&self) -> impl Iterator<Item = &FileIdentity> {
        self.identities
            .iter()
            .filter(|id| id.has_extension(AuditConfig::DOCUMENT_EXTENSION))
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// True when the walk found no files.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Files the walk had to skip.
    pub fn skipped(&self) -> &[IndexSkip] {
        &self.skipped
    }

    /// Absolute path of an identity under this index's root.
    pub fn absolute_path(&self, identity: &FileIdentity) -> PathBuf {
        identity.to_path_under(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_build_indexes_nested_files() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "readme.md", "hello");
        write_file(temp.path(), "docs/a/x.md", "hello");
        write_file(temp.path(), "docs/img 1.png", "");

        let index = FileIndex::build(temp.path()).unwrap();

        assert_eq!(index.len(), 3);
        assert!(index.contains(&FileIdentity::new("docs/a/x.md")));
        assert!(index.contains(&FileIdentity::new("docs/img 1.png")));
        assert!(!index.contains(&FileIdentity::new("docs/missing.md")));
    }

    #[test]
    fn test_build_fails_for_missing_root() {
        let result = FileIndex::build("/nonexistent/path/that/does/not/exist");
        assert!(matches!(result, Err(DocweaveError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_build_fails_for_file_root() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "readme.md", "hello");
        let result = FileIndex::build(temp.path().join("readme.md"));
        assert!(matches!(result, Err(DocweaveError::NotADirectory(_))));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "docs/Image.PNG", "");

        let index = FileIndex::build(temp.path()).unwrap();
        let probe = FileIdentity::new("docs/image.png");

        assert!(!index.contains(&probe));
        assert_eq!(
            index.get_case_insensitive(&probe).map(FileIdentity::as_str),
            Some("docs/Image.PNG")
        );
    }

    #[test]
    fn test_documents_filter() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a.md", "");
        write_file(temp.path(), "b.MD", "");
        write_file(temp.path(), "c.png", "");

        let index = FileIndex::build(temp.path()).unwrap();
        let docs: Vec<_> = index.documents().map(FileIdentity::as_str).collect();
        assert_eq!(docs, vec!["a.md", "b.MD"]);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "z.md", "");
        write_file(temp.path(), "a.md", "");
        write_file(temp.path(), "m/q.md", "");

        let index = FileIndex::build(temp.path()).unwrap();
        let all: Vec<_> = index.iter().map(FileIdentity::as_str).collect();
        assert_eq!(all, vec!["a.md", "m/q.md", "z.md"]);
    }
}

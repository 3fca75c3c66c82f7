//! Canonical tree-relative file identities.
//!
//! A [`FileIdentity`] names exactly one file within a documentation tree:
//! URL-decoded, `/`-separated, no leading or trailing slashes, no `.` or
//! `..` segments. Every real file has exactly one identity string; the
//! engine never materializes the same file under two spellings. Comparisons
//! are case-sensitive; case-insensitive fallbacks exist only as secondary
//! lookup maps, never as storage.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// Canonical tree-relative path uniquely naming one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileIdentity(String);

impl FileIdentity {
    /// Create an identity from an already tree-relative string.
    ///
    /// Separators are normalized to `/`, empty and `.` segments dropped.
    /// The input must not contain `..` segments; relative targets go
    /// through [`crate::links::resolve`] instead.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().replace('\\', "/");
        let joined = normalized
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// Create an identity from a path already made relative to the tree
    /// root (e.g. via `strip_prefix`). Returns `None` for paths that are
    /// not valid UTF-8, which the caller records as a skip.
    pub fn from_relative_path(path: &Path) -> Option<Self> {
        path.to_str().map(Self::new)
    }

    /// Percent-decode a raw link target.
    ///
    /// Targets that decode to invalid UTF-8 are kept as written, matching
    /// the best-effort decoding of the audit input format.
    pub fn decode_target(target: &str) -> Cow<'_, str> {
        match urlencoding::decode(target) {
            Ok(decoded) => decoded,
            Err(_) => Cow::Borrowed(target),
        }
    }

    /// The canonical form as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The containing directory in canonical form; empty string for files
    /// at the tree root.
    pub fn parent_dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// The final path segment.
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// The extension of the final segment, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Case-insensitive extension check.
    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    }

    /// True if the extension is one of `exts` (case-insensitive).
    pub fn has_any_extension(&self, exts: &[&str]) -> bool {
        exts.iter().any(|ext| self.has_extension(ext))
    }

    /// Iterate the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Lowercased canonical form, for secondary lookup maps.
    pub fn to_lowercase_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Materialize this identity as a filesystem path under `root`.
    pub fn to_path_under(&self, root: &Path) -> std::path::PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.segments() {
            path.push(segment);
        }
        path
    }

    /// Spell this identity as a relative path from `dir` (a canonical
    /// directory string, empty meaning the tree root).
    ///
    /// This is how a rewritten link is addressed from its document's new
    /// containing directory.
    pub fn relative_from(&self, dir: &str) -> String {
        let dir_segments: Vec<&str> = if dir.is_empty() {
            Vec::new()
        } else {
            dir.split('/').collect()
        };
        let own_segments: Vec<&str> = self.segments().collect();

        let mut common = 0;
        while common < dir_segments.len()
            && common < own_segments.len()
            && dir_segments[common] == own_segments[common]
        {
            common += 1;
        }

        let mut parts: Vec<&str> = Vec::with_capacity(dir_segments.len() - common + own_segments.len());
        for _ in common..dir_segments.len() {
            parts.push("..");
        }
        parts.extend(&own_segments[common..]);

        if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_separators_and_dots() {
        assert_eq!(FileIdentity::new("docs\\a\\b.md").as_str(), "docs/a/b.md");
        assert_eq!(FileIdentity::new("./docs/a.md").as_str(), "docs/a.md");
        assert_eq!(FileIdentity::new("/docs//a.md/").as_str(), "docs/a.md");
    }

    #[test]
    fn test_parent_and_file_name() {
        let id = FileIdentity::new("docs/a/x.md");
        assert_eq!(id.parent_dir(), "docs/a");
        assert_eq!(id.file_name(), "x.md");

        let top = FileIdentity::new("readme.md");
        assert_eq!(top.parent_dir(), "");
        assert_eq!(top.file_name(), "readme.md");
    }

    #[test]
    fn test_extension() {
        assert_eq!(FileIdentity::new("a/b.PNG").extension(), Some("PNG"));
        assert!(FileIdentity::new("a/b.PNG").has_extension("png"));
        assert_eq!(FileIdentity::new("a/Makefile").extension(), None);
        // A leading dot is a hidden-file marker, not an extension boundary.
        assert_eq!(FileIdentity::new("a/.gitignore").extension(), None);
    }

    #[test]
    fn test_decode_target() {
        assert_eq!(FileIdentity::decode_target("img%201.png"), "img 1.png");
        assert_eq!(FileIdentity::decode_target("plain.md"), "plain.md");
    }

    #[test]
    fn test_relative_from_sibling_directory() {
        let id = FileIdentity::new("docs/img-1.png");
        assert_eq!(id.relative_from("docs/a"), "../img-1.png");
    }

    #[test]
    fn test_relative_from_root() {
        let id = FileIdentity::new("docs/img-1.png");
        assert_eq!(id.relative_from(""), "docs/img-1.png");
    }

    #[test]
    fn test_relative_from_same_directory() {
        let id = FileIdentity::new("docs/a/y.md");
        assert_eq!(id.relative_from("docs/a"), "y.md");
    }

    #[test]
    fn test_relative_from_deeper_directory() {
        let id = FileIdentity::new("assets/logo.svg");
        assert_eq!(id.relative_from("docs/guides/setup"), "../../../assets/logo.svg");
    }
}

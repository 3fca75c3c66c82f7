//! Filesystem-safe identity sanitization and the rename table.
//!
//! Strips GUID-like noise and non-portable characters from every path
//! segment while preserving directory structure. Sanitization is
//! idempotent: sanitizing an already-sanitized identity is a no-op, which
//! the rewriter relies on when resolving chains of renames.

use crate::config::MigrationConfig;
use crate::identity::FileIdentity;
use crate::index::FileIndex;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use tracing::warn;

/// Bare 32-hex-digit run (a squashed GUID), with preceding whitespace.
static HEX32: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[a-f0-9]{32}\b").unwrap());

/// Hyphen-optional 8-4-4-4-12 UUID, with preceding whitespace.
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[a-f0-9]{8}-?[a-f0-9]{4}-?[a-f0-9]{4}-?[a-f0-9]{4}-?[a-f0-9]{12}\b").unwrap()
});

/// Bare 16-hex-digit run, with preceding whitespace.
static HEX16: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[0-9a-f]{16}\b").unwrap());

/// Parenthesized hex token, e.g. ` (1)` or ` (a3f)`.
static PAREN_HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\([0-9a-f]+\)").unwrap());

/// Characters reserved on NTFS that are replaced with a hyphen.
static RESERVED_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// Runs of consecutive hyphens.
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// The UTF-8 bytes of the ellipsis as mis-decoded through cp1252.
const MANGLED_ELLIPSIS: &str = "\u{00e2}\u{20ac}\u{00a6}";

/// Sanitize one path segment.
///
/// # Rules Applied
/// 1. Strip GUID-like substrings (32-hex, UUID, 16-hex, parenthesized hex)
///    along with immediately preceding whitespace
/// 2. Repair the mis-encoded ellipsis byte sequence to `...`
/// 3. Replace spaces with hyphens
/// 4. Replace NTFS-reserved characters with hyphens
/// 5. Drop characters outside 7-bit ASCII
/// 6. Collapse consecutive hyphens, trim leading/trailing hyphens
/// 7. Substitute `untitled` for empty or `.` results
///
/// Non-ASCII removal happens before the hyphen collapse so that a dropped
/// character between two hyphens cannot leave a `--` run behind; that
/// ordering is what makes the function idempotent.
pub fn sanitize_segment(segment: &str) -> String {
    let mut cleaned = HEX32.replace_all(segment, "").into_owned();
    cleaned = UUID_PATTERN.replace_all(&cleaned, "").into_owned();
    cleaned = HEX16.replace_all(&cleaned, "").into_owned();
    cleaned = PAREN_HEX.replace_all(&cleaned, "").into_owned();

    cleaned = cleaned.replace(MANGLED_ELLIPSIS, "...");
    cleaned = cleaned.replace(' ', "-");
    cleaned = RESERVED_CHARS.replace_all(&cleaned, "-").into_owned();
    cleaned.retain(|c| c.is_ascii());
    cleaned = HYPHEN_RUNS.replace_all(&cleaned, "-").into_owned();
    cleaned = cleaned.trim_matches('-').to_string();

    if cleaned.is_empty() || cleaned == "." {
        MigrationConfig::EMPTY_SEGMENT_PLACEHOLDER.to_string()
    } else {
        cleaned
    }
}

/// Sanitize every segment of an identity, preserving segment boundaries.
pub fn sanitize_identity(identity: &FileIdentity) -> FileIdentity {
    let cleaned = identity
        .segments()
        .map(sanitize_segment)
        .collect::<Vec<_>>()
        .join("/");
    FileIdentity::new(cleaned)
}

/// Two or more sources whose sanitized forms coincide.
#[derive(Debug, Clone, Serialize)]
pub struct RenameCollision {
    /// The contested sanitized identity.
    pub target: FileIdentity,
    /// Every source that maps to it, in sorted order.
    pub sources: Vec<FileIdentity>,
}

/// Total mapping from original to sanitized identity for every file
/// selected for migration. Built once, read-only afterward.
#[derive(Debug, Default)]
pub struct RenameTable {
    entries: BTreeMap<FileIdentity, FileIdentity>,
    lower: HashMap<String, FileIdentity>,
    collisions: Vec<RenameCollision>,
}

impl RenameTable {
    /// Build the table over every supported file in the index.
    ///
    /// Sources whose sanitized identities collide are withheld from the
    /// table (so nothing is silently overwritten) and surfaced in
    /// [`RenameTable::collisions`]; the rest of the tree still migrates.
    pub fn build(index: &FileIndex) -> Self {
        let mut entries: BTreeMap<FileIdentity, FileIdentity> = BTreeMap::new();
        for source in index.iter() {
            if !source.has_any_extension(MigrationConfig::SUPPORTED_EXTENSIONS) {
                continue;
            }
            entries.insert(source.clone(), sanitize_identity(source));
        }

        let mut by_target: BTreeMap<FileIdentity, Vec<FileIdentity>> = BTreeMap::new();
        for (source, target) in &entries {
            by_target
                .entry(target.clone())
                .or_default()
                .push(source.clone());
        }

        let mut collisions = Vec::new();
        for (target, sources) in by_target {
            if sources.len() > 1 {
                warn!(
                    "Rename collision on {}: {} sources",
                    target,
                    sources.len()
                );
                for source in &sources {
                    entries.remove(source);
                }
                collisions.push(RenameCollision { target, sources });
            }
        }

        // First entry wins; this map exists only for fallback lookups.
        let mut lower = HashMap::with_capacity(entries.len());
        for (source, target) in &entries {
            lower
                .entry(source.to_lowercase_key())
                .or_insert_with(|| target.clone());
        }

        Self {
            entries,
            lower,
            collisions,
        }
    }

    /// Look up the sanitized identity for a source: exact match first,
    /// then the case-insensitive fallback.
    pub fn lookup(&self, source: &FileIdentity) -> Option<&FileIdentity> {
        self.entries
            .get(source)
            .or_else(|| self.lower.get(&source.to_lowercase_key()))
    }

    /// Iterate (source, target) pairs in sorted source order.
    pub fn entries(&self) -> impl Iterator<Item = (&FileIdentity, &FileIdentity)> {
        self.entries.iter()
    }

    /// Number of mapped (non-colliding) files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was selected for migration.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collisions detected during the build.
    pub fn collisions(&self) -> &[RenameCollision] {
        &self.collisions
    }
}

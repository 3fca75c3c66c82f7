//! Centralized configuration for docweave.
//!
//! Extension lists, report caps, and the placeholder default directories
//! used by the CLI when no arguments are given.

/// Configuration for the migration pipeline.
pub struct MigrationConfig;

impl MigrationConfig {
    /// File extensions included in the migration file map (case-insensitive).
    /// Files with any other extension are invisible to migration but remain
    /// visible to the audit index.
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] =
        &["md", "png", "jpg", "jpeg", "gif", "svg", "mp4", "mov", "csv"];

    /// Placeholder segment substituted when sanitization empties a name.
    pub const EMPTY_SEGMENT_PLACEHOLDER: &'static str = "untitled";
}

/// Configuration for the audit pipeline.
pub struct AuditConfig;

impl AuditConfig {
    /// Extension identifying documents that are scanned for outgoing links.
    pub const DOCUMENT_EXTENSION: &'static str = "md";

    /// Media extensions checked for being referenced from some document.
    pub const ASSET_EXTENSIONS: &'static [&'static str] =
        &["png", "jpg", "jpeg", "gif", "svg", "mp4", "mov"];

    /// Maximum number of replacement suggestions per broken link.
    pub const MAX_SUGGESTIONS: usize = 3;
}

/// CLI defaults and display limits.
pub struct CliConfig;

impl CliConfig {
    /// Placeholder root scanned by `audit` when no argument is given.
    pub const DEFAULT_AUDIT_ROOT: &'static str = "Target Directory";

    /// Placeholder source tree for `migrate`.
    pub const DEFAULT_MIGRATE_SOURCE: &'static str = "Source Directory";

    /// Placeholder target tree for `migrate`.
    pub const DEFAULT_MIGRATE_TARGET: &'static str = "Target Directory";

    /// How many errors/skips the migration summary prints before the
    /// overflow counter takes over.
    pub const MAX_DISPLAYED_FAILURES: usize = 10;
}

//! docweave core - Headless library for documentation tree auditing and
//! link-preserving migration.
//!
//! Two pipelines share one resolution engine. The auditor classifies every
//! link in a Markdown tree as valid or broken and finds assets nothing
//! links to; the migrator copies the tree to sanitized (portable,
//! GUID-free) names while rewriting every relative link so the document
//! graph stays internally consistent.
//!
//! Documents are treated as text: links are recognized via a fixed
//! syntactic pattern, not a Markdown AST. External URLs, anchors, and
//! mail addresses are out of this engine's authority and never touched.
//!
//! # Example
//!
//! ```rust,ignore
//! use docweave_core::{Auditor, FileIndex, Migrator};
//!
//! fn main() -> docweave_core::Result<()> {
//!     // Audit a tree for broken links and orphaned assets.
//!     let index = FileIndex::build("docs")?;
//!     let report = Auditor::new(&index).run();
//!     println!("{} broken links", report.stats.total_broken_links);
//!
//!     // Migrate it to sanitized names with rewritten links.
//!     let summary = Migrator::new("docs", "docs-clean").run()?;
//!     println!("{} files migrated", summary.processed);
//!
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod identity;
pub mod index;
pub mod links;
pub mod migrate;
pub mod rename;

// Re-export commonly used types
pub use audit::{Auditor, BrokenLink, IntegrityReport, IntegrityStats};
pub use config::{AuditConfig, CliConfig, MigrationConfig};
pub use error::{DocweaveError, Result};
pub use identity::FileIdentity;
pub use index::{FileIndex, IndexSkip};
pub use links::{extract_targets, resolve, rewrite_document, Resolution};
pub use migrate::{MigrationFailure, MigrationRecord, MigrationSummary, Migrator};
pub use rename::{sanitize_identity, sanitize_segment, RenameCollision, RenameTable};

//! Link extraction, resolution, and rewriting.
//!
//! The engine shared by both pipelines:
//! - [`scan`] / [`extract_targets`]: find link occurrences in document text
//!   (the only regex-aware code; a future AST-based parser would replace
//!   just the `extract` module)
//! - [`resolve`]: turn a document-relative target into a tree identity,
//!   purely lexically
//! - [`rewrite_document`]: respell every mapped link relative to the
//!   document's new location
//!
//! # Architecture
//!
//! ```text
//! document text
//!     │
//!     ├── scan ──────────► LinkOccurrence (ordered, with spans)
//!     │                        │
//!     ├── extract_targets ─► distinct decoded targets ──► resolve ──► audit
//!     │                        │
//!     └── rewrite_document ◄───┘ (resolve under old identity,
//!                                 map through rename table,
//!                                 respell under new identity)
//! ```

mod extract;
mod resolve;
mod rewrite;

pub use extract::{extract_targets, is_excluded, scan, LinkOccurrence};
pub use resolve::{resolve, Resolution};
pub use rewrite::rewrite_document;

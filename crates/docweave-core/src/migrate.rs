//! Tree migration: copy every selected file under its sanitized identity,
//! rewriting document links along the way.
//!
//! Per-entry failures (missing source, unreadable file) are collected and
//! reported; they never abort the remaining copies. Only a missing source
//! root stops a run before it starts.

use crate::error::{DocweaveError, Result};
use crate::identity::FileIdentity;
use crate::index::{FileIndex, IndexSkip};
use crate::links::rewrite_document;
use crate::rename::{RenameCollision, RenameTable};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// One successfully migrated file.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationRecord {
    pub source: FileIdentity,
    pub target: FileIdentity,
    pub size_bytes: u64,
}

/// One file that could not be migrated.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationFailure {
    pub source: FileIdentity,
    pub message: String,
}

/// Read-only result of one migration run.
#[derive(Debug, Serialize)]
pub struct MigrationSummary {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    pub source_root: String,
    pub target_root: String,
    /// Files copied or rewritten successfully.
    pub processed: usize,
    /// Size of the rename table (non-colliding entries).
    pub file_map_size: usize,
    pub records: Vec<MigrationRecord>,
    pub failures: Vec<MigrationFailure>,
    pub collisions: Vec<RenameCollision>,
    /// Files the index walk could not take in.
    pub skipped: Vec<IndexSkip>,
}

impl MigrationSummary {
    /// Failures plus collisions, for the summary header.
    pub fn error_count(&self) -> usize {
        self.failures.len() + self.collisions.len()
    }
}

/// Copies a documentation tree to sanitized names with rewritten links.
pub struct Migrator {
    source_root: PathBuf,
    target_root: PathBuf,
}

impl Migrator {
    /// Create a migrator between two tree roots.
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    /// Index the source tree, build the rename table, and materialize the
    /// migrated tree. The target root (and any needed parents) is created.
    pub fn run(&self) -> Result<MigrationSummary> {
        let index = FileIndex::build(&self.source_root)?;
        let table = RenameTable::build(&index);

        fs::create_dir_all(&self.target_root)
            .map_err(|e| DocweaveError::io_with_path(e, &self.target_root))?;

        info!(
            "Migrating {} files from {} to {}",
            table.len(),
            self.source_root.display(),
            self.target_root.display()
        );

        let mut records = Vec::new();
        let mut failures = Vec::new();

        for (source, target) in table.entries() {
            match self.copy_entry(&index, &table, source, target) {
                Ok(size_bytes) => records.push(MigrationRecord {
                    source: source.clone(),
                    target: target.clone(),
                    size_bytes,
                }),
                Err(err) => {
                    warn!("Failed to migrate {}: {}", source, err);
                    failures.push(MigrationFailure {
                        source: source.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        for collision in table.collisions() {
            let err = DocweaveError::RenameCollision {
                target: collision.target.as_str().to_string(),
                sources: collision
                    .sources
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            };
            warn!("{err}");
        }

        Ok(MigrationSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source_root: self.source_root.display().to_string(),
            target_root: self.target_root.display().to_string(),
            processed: records.len(),
            file_map_size: table.len(),
            records,
            failures,
            collisions: table.collisions().to_vec(),
            skipped: index.skipped().to_vec(),
        })
    }

    /// Copy one entry; documents are rewritten, everything else is copied
    /// byte-for-byte. Returns the source file size.
    fn copy_entry(
        &self,
        index: &FileIndex,
        table: &RenameTable,
        source: &FileIdentity,
        target: &FileIdentity,
    ) -> Result<u64> {
        let source_path = index.absolute_path(source);
        if !source_path.exists() {
            return Err(DocweaveError::FileNotFound(source_path));
        }

        let target_path = target.to_path_under(&self.target_root);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| DocweaveError::io_with_path(e, parent))?;
        }

        if source.has_extension("md") {
            let text = fs::read_to_string(&source_path)
                .map_err(|e| DocweaveError::io_with_path(e, &source_path))?;
            let rewritten = rewrite_document(&text, source, target, table);
            fs::write(&target_path, rewritten)
                .map_err(|e| DocweaveError::io_with_path(e, &target_path))?;
            let meta = fs::metadata(&source_path)
                .map_err(|e| DocweaveError::io_with_path(e, &source_path))?;
            Ok(meta.len())
        } else {
            fs::copy(&source_path, &target_path)
                .map_err(|e| DocweaveError::io_with_path(e, &source_path))
        }
    }
}

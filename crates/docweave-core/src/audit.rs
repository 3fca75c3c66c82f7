//! Link-integrity auditing.
//!
//! Classifies every link in every document against the file index, finds
//! assets nothing links to, and packages the result as an immutable
//! [`IntegrityReport`]. Computed once per run and discarded; reruns
//! recompute from scratch.

use crate::config::AuditConfig;
use crate::identity::FileIdentity;
use crate::index::FileIndex;
use crate::links::{extract_targets, resolve, Resolution};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use tracing::{debug, warn};

/// A link whose resolved identity is not in the index.
#[derive(Debug, Clone, Serialize)]
pub struct BrokenLink {
    /// The decoded target as extracted from the document.
    pub target: String,
    /// The identity it resolved to, when resolution stayed inside the tree.
    pub resolved: Option<FileIdentity>,
    /// Up to [`AuditConfig::MAX_SUGGESTIONS`] candidate replacements, in
    /// index order.
    pub suggestions: Vec<FileIdentity>,
}

/// Aggregate counts for the report footer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityStats {
    pub total_files: usize,
    pub documents_with_broken_links: usize,
    pub unreferenced_assets: usize,
    pub documents_without_links: usize,
    pub total_broken_links: usize,
    pub total_valid_links: usize,
}

/// Read-only result of one audit run, sorted by document identity.
#[derive(Debug, Serialize)]
pub struct IntegrityReport {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// The audited tree root.
    pub root: String,
    /// Per-document valid link targets (decoded, as written).
    pub valid_links: BTreeMap<FileIdentity, Vec<String>>,
    /// Per-document broken links.
    pub broken_links: BTreeMap<FileIdentity, Vec<BrokenLink>>,
    /// Documents that could not be read, with the reason.
    pub unreadable_documents: BTreeMap<FileIdentity, String>,
    /// Media assets never referenced by any document.
    pub unreferenced_assets: BTreeSet<FileIdentity>,
    /// Documents whose extraction yielded no links at all.
    pub documents_without_links: BTreeSet<FileIdentity>,
    /// Aggregate counts.
    pub stats: IntegrityStats,
}

/// Builds an [`IntegrityReport`] from a file index.
pub struct Auditor<'a> {
    index: &'a FileIndex,
}

impl<'a> Auditor<'a> {
    /// Create an auditor over an already-built index.
    pub fn new(index: &'a FileIndex) -> Self {
        Self { index }
    }

    /// Check every document and classify every link.
    pub fn run(&self) -> IntegrityReport {
        let mut valid_links: BTreeMap<FileIdentity, Vec<String>> = BTreeMap::new();
        let mut broken_links: BTreeMap<FileIdentity, Vec<BrokenLink>> = BTreeMap::new();
        let mut unreadable_documents = BTreeMap::new();
        let mut documents_without_links = BTreeSet::new();
        let mut referenced: BTreeSet<FileIdentity> = BTreeSet::new();

        for document in self.index.documents() {
            let path = self.index.absolute_path(document);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!("Cannot read {}: {}", path.display(), err);
                    unreadable_documents.insert(document.clone(), err.to_string());
                    continue;
                }
            };

            let targets = extract_targets(&text);
            if targets.is_empty() {
                documents_without_links.insert(document.clone());
                continue;
            }

            for target in targets {
                match resolve(document, &target) {
                    Resolution::Resolved(identity) => {
                        referenced.insert(identity.clone());
                        if self.index.contains(&identity) {
                            valid_links.entry(document.clone()).or_default().push(target);
                        } else {
                            let suggestions = self.suggest(identity.as_str());
                            broken_links.entry(document.clone()).or_default().push(
                                BrokenLink {
                                    target,
                                    resolved: Some(identity),
                                    suggestions,
                                },
                            );
                        }
                    }
                    Resolution::OutsideTree | Resolution::Empty => {
                        let suggestions = self.suggest(&target.replace('\\', "/"));
                        broken_links.entry(document.clone()).or_default().push(BrokenLink {
                            target,
                            resolved: None,
                            suggestions,
                        });
                    }
                }
            }
        }

        let unreferenced_assets: BTreeSet<FileIdentity> = self
            .index
            .iter()
            .filter(|id| id.has_any_extension(AuditConfig::ASSET_EXTENSIONS))
            .filter(|id| !referenced.contains(id))
            .cloned()
            .collect();

        let stats = IntegrityStats {
            total_files: self.index.len(),
            documents_with_broken_links: broken_links.len(),
            unreferenced_assets: unreferenced_assets.len(),
            documents_without_links: documents_without_links.len(),
            total_broken_links: broken_links.values().map(Vec::len).sum(),
            total_valid_links: valid_links.values().map(Vec::len).sum(),
        };

        debug!(
            "Audit complete: {} valid, {} broken",
            stats.total_valid_links, stats.total_broken_links
        );

        IntegrityReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            root: self.index.root().display().to_string(),
            valid_links,
            broken_links,
            unreadable_documents,
            unreferenced_assets,
            documents_without_links,
            stats,
        }
    }

    /// Candidate replacements for a broken target.
    ///
    /// A candidate matches when its final segment contains the broken
    /// target's final segment (case-insensitive), or when it equals the
    /// broken target with `.md` appended. Candidates are taken in index
    /// iteration order, which is sorted identity order. No relevance ranking.
    fn suggest(&self, broken: &str) -> Vec<FileIdentity> {
        let needle = broken
            .rsplit('/')
            .next()
            .unwrap_or(broken)
            .to_lowercase();
        let with_md_extension = format!("{}.md", broken.to_lowercase());

        let mut suggestions = Vec::new();
        for candidate in self.index.iter() {
            let name_matches =
                !needle.is_empty() && candidate.file_name().to_lowercase().contains(&needle);
            let md_matches = candidate.to_lowercase_key() == with_md_extension;
            if name_matches || md_matches {
                suggestions.push(candidate.clone());
                if suggestions.len() == AuditConfig::MAX_SUGGESTIONS {
                    break;
                }
            }
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn audit(temp: &TempDir) -> IntegrityReport {
        let index = FileIndex::build(temp.path()).unwrap();
        Auditor::new(&index).run()
    }

    #[test]
    fn test_valid_and_broken_classification() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a/b.md", "[ok](../c/d.png) [bad](../c/missing.png)");
        write_file(temp.path(), "c/d.png", "");

        let report = audit(&temp);
        let doc = FileIdentity::new("a/b.md");

        assert_eq!(report.valid_links[&doc], vec!["../c/d.png".to_string()]);
        assert_eq!(report.broken_links[&doc].len(), 1);
        assert_eq!(report.broken_links[&doc][0].target, "../c/missing.png");
        assert_eq!(
            report.broken_links[&doc][0].resolved,
            Some(FileIdentity::new("c/missing.png"))
        );
    }

    #[test]
    fn test_excluded_targets_never_reported() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            "a.md",
            "[x](http://example.com) [y](#top) [z](/etc/hosts) [m](mailto:a@b.c)",
        );

        let report = audit(&temp);
        let doc = FileIdentity::new("a.md");

        assert!(report.broken_links.is_empty());
        assert!(report.valid_links.is_empty());
        // Only excluded targets means extraction yields nothing.
        assert!(report.documents_without_links.contains(&doc));
    }

    #[test]
    fn test_documents_without_links_distinct_from_broken() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "empty.md", "no links at all");
        write_file(temp.path(), "broken.md", "[x](gone.md)");

        let report = audit(&temp);

        assert!(report
            .documents_without_links
            .contains(&FileIdentity::new("empty.md")));
        assert!(!report
            .documents_without_links
            .contains(&FileIdentity::new("broken.md")));
        assert!(report
            .broken_links
            .contains_key(&FileIdentity::new("broken.md")));
    }

    #[test]
    fn test_unreferenced_asset_detection() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "doc.md", "![used](img/used.png)");
        write_file(temp.path(), "img/used.png", "");
        write_file(temp.path(), "img/orphan.png", "");
        write_file(temp.path(), "img/clip.mp4", "");

        let report = audit(&temp);

        assert!(!report
            .unreferenced_assets
            .contains(&FileIdentity::new("img/used.png")));
        assert!(report
            .unreferenced_assets
            .contains(&FileIdentity::new("img/orphan.png")));
        assert!(report
            .unreferenced_assets
            .contains(&FileIdentity::new("img/clip.mp4")));
    }

    #[test]
    fn test_asset_referenced_via_traversal_is_not_unreferenced() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "docs/deep/page.md", "![x](../../img/shared.png)");
        write_file(temp.path(), "img/shared.png", "");

        let report = audit(&temp);
        assert!(report.unreferenced_assets.is_empty());
    }

    #[test]
    fn test_suggestions_capped_at_three() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "doc.md", "[x](guide.md)");
        for i in 0..5 {
            write_file(temp.path(), &format!("g{i}/guide.md"), "");
        }

        let report = audit(&temp);
        let doc = FileIdentity::new("doc.md");
        let broken = &report.broken_links[&doc][0];

        assert_eq!(broken.suggestions.len(), 3);
        // Index order is sorted identity order.
        assert_eq!(broken.suggestions[0].as_str(), "g0/guide.md");
        assert_eq!(broken.suggestions[1].as_str(), "g1/guide.md");
    }

    #[test]
    fn test_suggestion_for_missing_md_extension() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "doc.md", "[x](notes/setup)");
        write_file(temp.path(), "notes/setup.md", "");

        let report = audit(&temp);
        let doc = FileIdentity::new("doc.md");
        let broken = &report.broken_links[&doc][0];

        assert!(broken
            .suggestions
            .contains(&FileIdentity::new("notes/setup.md")));
    }

    #[test]
    fn test_stats_totals() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a.md", "[v](b.md) [w](img.png) [x](gone.md)");
        write_file(temp.path(), "b.md", "plain");
        write_file(temp.path(), "img.png", "");

        let report = audit(&temp);

        assert_eq!(report.stats.total_files, 3);
        assert_eq!(report.stats.total_valid_links, 2);
        assert_eq!(report.stats.total_broken_links, 1);
        assert_eq!(report.stats.documents_with_broken_links, 1);
        assert_eq!(report.stats.documents_without_links, 1);
        assert_eq!(report.stats.unreferenced_assets, 0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a.md", "[v](b.md)");
        write_file(temp.path(), "b.md", "plain");

        let report = audit(&temp);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["valid_links"]["a.md"].is_array());
        assert_eq!(json["stats"]["total_valid_links"], 1);
    }
}

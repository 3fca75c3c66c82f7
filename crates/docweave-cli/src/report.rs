//! Text report printing for both subcommands.
//!
//! Everything here goes to stdout on purpose; diagnostics during the run
//! travel through `tracing` instead. Sections are sorted by document
//! identity (the report's maps are ordered), so output is deterministic.

use docweave_core::{CliConfig, IntegrityReport, MigrationSummary};

const HEAVY_RULE: &str =
    "================================================================================";
const LIGHT_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Print the audit report.
pub fn print_integrity_report(report: &IntegrityReport) {
    println!();
    println!("Validation Report");
    println!("{HEAVY_RULE}");

    if !report.broken_links.is_empty() {
        println!("\nBroken Links Found:");
        println!("{LIGHT_RULE}");
        for (document, links) in &report.broken_links {
            println!("\nFile: {document}");
            for link in links {
                println!("  - {}", link.target);
                if !link.suggestions.is_empty() {
                    println!("    Possible matches:");
                    for suggestion in &link.suggestions {
                        println!("    -> {suggestion}");
                    }
                }
            }
        }
    }

    if !report.unreadable_documents.is_empty() {
        println!("\nUnreadable Files:");
        println!("{LIGHT_RULE}");
        for (document, reason) in &report.unreadable_documents {
            println!("  - {document}: {reason}");
        }
    }

    if !report.unreferenced_assets.is_empty() {
        println!("\nUnreferenced Files:");
        println!("{LIGHT_RULE}");
        for asset in &report.unreferenced_assets {
            println!("  - {asset}");
        }
    }

    if !report.documents_without_links.is_empty() {
        println!("\nFiles with No Links:");
        println!("{LIGHT_RULE}");
        for document in &report.documents_without_links {
            println!("  - {document}");
        }
    }

    println!("\nStatistics:");
    println!("{LIGHT_RULE}");
    println!("Total files: {}", report.stats.total_files);
    println!(
        "Files with broken links: {}",
        report.stats.documents_with_broken_links
    );
    println!("Unreferenced files: {}", report.stats.unreferenced_assets);
    println!(
        "Files with no links: {}",
        report.stats.documents_without_links
    );
    println!("Total broken links: {}", report.stats.total_broken_links);
    println!("Total valid links: {}", report.stats.total_valid_links);
}

/// Print the migration summary.
pub fn print_migration_summary(summary: &MigrationSummary) {
    println!("\nProcessing Summary:");
    println!("Total files processed: {}", summary.processed);
    println!("Errors encountered: {}", summary.error_count());
    println!("Files mapped: {}", summary.file_map_size);

    let cap = CliConfig::MAX_DISPLAYED_FAILURES;

    if summary.error_count() > 0 {
        println!("\nErrors encountered:");
        let mut shown = 0;
        for failure in &summary.failures {
            if shown == cap {
                break;
            }
            println!("  - {}: {}", failure.source, failure.message);
            shown += 1;
        }
        for collision in &summary.collisions {
            if shown == cap {
                break;
            }
            let sources: Vec<&str> = collision.sources.iter().map(|s| s.as_str()).collect();
            println!(
                "  - {}: rename collision between [{}]",
                collision.target,
                sources.join(", ")
            );
            shown += 1;
        }
        if summary.error_count() > cap {
            println!("  ... and {} more", summary.error_count() - cap);
        }
    }

    if !summary.skipped.is_empty() {
        println!("\nSkipped files:");
        for skip in summary.skipped.iter().take(cap) {
            println!("  - {}: {}", skip.path.display(), skip.reason);
        }
        if summary.skipped.len() > cap {
            println!("  ... and {} more", summary.skipped.len() - cap);
        }
    }
}

//! docweave - audit and migrate interlinked documentation trees.
//!
//! This binary wraps the docweave-core library: it parses arguments, sets
//! up logging, and prints reports. Both subcommands are reporting tools,
//! not build gates: a tree full of broken links still exits zero.

mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docweave_core::{Auditor, CliConfig, FileIndex, Migrator};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "docweave")]
#[command(about = "Audit and migrate interlinked documentation trees")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit machine-readable JSON instead of the text report
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every document link; report broken links and orphaned assets
    Audit {
        /// Root directory to scan
        #[arg(default_value = CliConfig::DEFAULT_AUDIT_ROOT)]
        root: PathBuf,
    },
    /// Copy a tree to sanitized names, rewriting links to match
    Migrate {
        /// Source tree to migrate
        #[arg(default_value = CliConfig::DEFAULT_MIGRATE_SOURCE)]
        source: PathBuf,
        /// Target tree (created if absent)
        #[arg(default_value = CliConfig::DEFAULT_MIGRATE_TARGET)]
        target: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Command::Audit { root } => run_audit(&root, cli.json),
        Command::Migrate { source, target } => run_migrate(&source, &target, cli.json),
    }
}

fn run_audit(root: &Path, json: bool) -> Result<()> {
    if !root.exists() {
        println!("Error: Directory not found: {}", root.display());
        return Ok(());
    }

    println!("Checking documentation in: {}", root.display());

    let index = FileIndex::build(root)?;
    info!("Found {} files", index.len());

    let report = Auditor::new(&index).run();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_integrity_report(&report);
    }
    Ok(())
}

fn run_migrate(source: &Path, target: &Path, json: bool) -> Result<()> {
    if !source.exists() {
        println!(
            "Error: Source directory does not exist: {}",
            source.display()
        );
        return Ok(());
    }

    println!("Source directory: {}", source.display());
    println!("Target directory: {}", target.display());

    let summary = Migrator::new(source, target).run()?;

    if summary.file_map_size == 0 && summary.error_count() == 0 {
        println!("No files to process!");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report::print_migration_summary(&summary);
    }
    Ok(())
}

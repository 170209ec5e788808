//! Batch command - consolidate a directory of Safety Data Sheets.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use sds_core::{BatchConsolidator, BatchObserver, DocumentResult, SourceDocument};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory holding the source documents
    #[arg(required = true)]
    source_dir: PathBuf,

    /// Directory for the consolidated table and intermediate files
    #[arg(required = true)]
    output_dir: PathBuf,

    /// Also write a per-document status CSV
    #[arg(long)]
    status_report: bool,

    /// Skip the per-document intermediate JSON files
    #[arg(long)]
    no_intermediate: bool,
}

/// Drives a progress bar from batch notifications.
struct ProgressObserver {
    pb: ProgressBar,
}

impl BatchObserver for ProgressObserver {
    fn on_start(&self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn on_document(&self, _index: usize, document: &SourceDocument) {
        self.pb.set_message(document.name.clone());
    }

    fn on_result(&self, _result: &DocumentResult) {
        self.pb.inc(1);
    }
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.no_intermediate {
        config.output.write_intermediate = false;
    }

    let consolidator = BatchConsolidator::from_config(&config)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );
    let observer = ProgressObserver { pb };

    let report = consolidator.run_with(&args.source_dir, &args.output_dir, &observer)?;
    observer.pb.finish_and_clear();

    if report.results.is_empty() {
        println!(
            "{} No documents matching {} found in {}",
            style("ℹ").blue(),
            config.reader.extensions.join(", "),
            args.source_dir.display()
        );
    }

    println!(
        "{} Consolidated table written to {}",
        style("✓").green(),
        report.table_path.display()
    );

    if args.status_report {
        let status_path = args.output_dir.join("status.csv");
        report.write_status_report(&status_path)?;
        println!(
            "{} Status report written to {}",
            style("✓").green(),
            status_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(report.success_count()).green(),
        style(report.failure_count()).red()
    );

    if report.failure_count() > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for result in report.failures() {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.status.message().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

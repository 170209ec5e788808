//! Process command - extract fields from a single document.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;

use sds_core::{
    BatchConsolidator, ConsolidatedTable, CsvExporter, DocumentProcessor, DocumentResult,
    ExtractedRecord, Field, SourceDocument,
};
use sds_core::batch::NoopObserver;

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Also write the intermediate file and a one-row table here
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let result = match &args.output_dir {
        Some(output_dir) => {
            let consolidator = BatchConsolidator::from_config(&config)?;
            let report =
                consolidator.run_files(&[args.input.clone()], output_dir, &NoopObserver)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                output_dir.display()
            );
            report
                .results
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("No result for {}", args.input.display()))?
        }
        None => {
            let processor = DocumentProcessor::from_config(&config)?.with_intermediate(false);
            processor.process(&SourceDocument::from_path(&args.input), Path::new("."))
        }
    };

    let record = match result {
        DocumentResult {
            record: Some(record),
            ..
        } => record,
        DocumentResult { status, .. } => {
            anyhow::bail!(
                "Failed to process {}: {}",
                args.input.display(),
                status.message().unwrap_or("unknown error")
            );
        }
    };

    debug!("{} of {} fields found", record.found_count(), Field::ALL.len());

    let source = SourceDocument::from_path(&args.input).name;
    print!(
        "{}",
        format_record(&source, &record, args.format, &config.output.absent_marker)?
    );

    Ok(())
}

fn format_record(
    source: &str,
    record: &ExtractedRecord,
    format: OutputFormat,
    absent_marker: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(record)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => {
            let mut table = ConsolidatedTable::new();
            table.push(source, record.clone());
            Ok(CsvExporter::new()
                .with_absent_marker(absent_marker)
                .to_string(&table)?)
        }
        OutputFormat::Text => Ok(format_text(source, record)),
    }
}

fn format_text(source: &str, record: &ExtractedRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", source));
    output.push('\n');

    for (field, value) in record.iter() {
        match value {
            Some(value) if value.contains('\n') => {
                output.push_str(&format!("{}:\n", field.label()));
                for line in value.lines() {
                    output.push_str(&format!("  {}\n", line));
                }
            }
            Some(value) => output.push_str(&format!("{}: {}\n", field.label(), value)),
            None => output.push_str(&format!("{}: -\n", field.label())),
        }
    }

    let missing = record.missing_fields();
    if !missing.is_empty() {
        output.push('\n');
        output.push_str(&format!("Missing: {} of {} fields\n", missing.len(), Field::ALL.len()));
    }

    output
}

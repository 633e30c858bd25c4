//! Process command - classify and extract a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docsift_core::{DocumentPipeline, DocumentReport};

use crate::source::load_text;

use super::{ProcessedDocument, format_amount, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, TXT or MD)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

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

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());
    let text = load_text(&args.input, &config.ingestion)?;

    let pipeline = DocumentPipeline::from_config(&config);
    let report = pipeline.classify_and_extract(&text).await;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    let output = format_report(&args.input, &report, processing_time_ms, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a report in the requested format.
pub fn format_report(
    path: &Path,
    report: &DocumentReport,
    processing_time_ms: u64,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ProcessedDocument::new(
            path,
            report,
            processing_time_ms,
        ))?),
        OutputFormat::Csv => format_csv(path, report),
        OutputFormat::Text => Ok(format_text(path, report)),
    }
}

fn format_csv(path: &Path, report: &DocumentReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "file",
        "category",
        "confidence",
        "total_amount",
        "date",
        "method",
    ])?;

    let file = path.display().to_string();
    let confidence = format!("{:.2}", report.confidence);
    let total = format_amount(report.fields.total_amount);
    let method = report.method();

    wtr.write_record([
        file.as_str(),
        report.category.label(),
        confidence.as_str(),
        total.as_str(),
        report.fields.date.as_deref().unwrap_or(""),
        method.as_str(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(path: &Path, report: &DocumentReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!(
        "Category: {} ({:.0}%)\n",
        report.category,
        report.confidence * 100.0
    ));
    output.push('\n');

    output.push_str("Fields:\n");
    match report.fields.total_amount {
        Some(amount) => output.push_str(&format!("  Total: {:.2}\n", amount)),
        None => output.push_str("  Total: -\n"),
    }
    output.push_str(&format!(
        "  Date:  {}\n",
        report.fields.date.as_deref().unwrap_or("-")
    ));
    for (key, value) in report.fields.extra() {
        output.push_str(&format!("  {}: {}\n", key, value));
    }
    output.push('\n');

    output.push_str(&format!("Method: {}\n", report.method()));

    output
}

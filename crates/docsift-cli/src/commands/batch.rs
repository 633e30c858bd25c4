//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use futures_util::{Stream, StreamExt, stream};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use docsift_core::models::config::IngestionConfig;
use docsift_core::{DocumentPipeline, DocumentReport};

use crate::source::{is_supported, load_text};

use super::format_amount;
use super::load_config;
use super::process::{OutputFormat, format_report};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of documents processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
#[derive(Debug)]
struct ProcessResult {
    path: PathBuf,
    report: Option<DocumentReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)
        .with_context(|| format!("Invalid glob pattern: {}", args.input))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(DocumentPipeline::from_config(&config));
    let ingestion = config.ingestion.clone();

    let processed = stream::iter(files)
        .map(|path| {
            let pipeline = pipeline.clone();
            let ingestion = ingestion.clone();
            let progress = progress.clone();

            async move {
                debug!("Processing {}", path.display());
                let file_start = Instant::now();
                let outcome = process_single_file(&path, &pipeline, ingestion).await;
                let processing_time_ms = file_start.elapsed().as_millis() as u64;
                progress.inc(1);

                match outcome {
                    Ok(report) => ProcessResult {
                        path,
                        report: Some(report),
                        error: None,
                        processing_time_ms,
                    },
                    Err(e) => {
                        warn!("Failed to process {}: {:#}", path.display(), e);
                        ProcessResult {
                            path,
                            report: None,
                            error: Some(format!("{:#}", e)),
                            processing_time_ms,
                        }
                    }
                }
            }
        })
        .buffer_unordered(args.jobs.max(1));

    let collected = collect_results(processed, args.continue_on_error).await;
    progress.finish_with_message("Complete");

    let mut results = collected?;
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(report) = &result.report {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                let content =
                    format_report(&result.path, report, result.processing_time_ms, args.format)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Drain per-file results as they complete.
///
/// Without `continue_on_error` the first failure ends the batch; dropping the
/// stream cancels documents still in flight and never starts the rest.
async fn collect_results<S>(results: S, continue_on_error: bool) -> anyhow::Result<Vec<ProcessResult>>
where
    S: Stream<Item = ProcessResult>,
{
    let mut results = std::pin::pin!(results);
    let mut collected = Vec::new();

    while let Some(result) = results.next().await {
        if !continue_on_error {
            if let Some(message) = &result.error {
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }
        collected.push(result);
    }

    Ok(collected)
}

async fn process_single_file(
    path: &Path,
    pipeline: &DocumentPipeline,
    ingestion: IngestionConfig,
) -> anyhow::Result<DocumentReport> {
    let owned = path.to_path_buf();
    let text = tokio::task::spawn_blocking(move || load_text(&owned, &ingestion)).await??;

    Ok(pipeline.classify_and_extract(&text).await)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "category",
        "confidence",
        "total_amount",
        "date",
        "method",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time_ms = result.processing_time_ms.to_string();

        if let Some(report) = &result.report {
            let confidence = format!("{:.2}", report.confidence);
            let total = format_amount(report.fields.total_amount);
            let method = report.method();

            wtr.write_record([
                filename,
                "success",
                report.category.label(),
                confidence.as_str(),
                total.as_str(),
                report.fields.date.as_deref().unwrap_or(""),
                method.as_str(),
                time_ms.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                time_ms.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

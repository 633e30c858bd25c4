//! Evaluate command - score the pipeline against labelled documents.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;

use docsift_core::DocumentPipeline;
use docsift_core::evaluation::{EvaluationReport, FieldMetrics, evaluate, load_cases};

use super::load_config;

/// Arguments for the evaluate command.
#[derive(Args)]
pub struct EvaluateArgs {
    /// JSON file with labelled cases
    #[arg(required = true)]
    cases: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: EvaluateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let cases = load_cases(&args.cases)
        .with_context(|| format!("Failed to load cases from {}", args.cases.display()))?;

    if cases.is_empty() {
        anyhow::bail!("No cases found in {}", args.cases.display());
    }

    let pipeline = DocumentPipeline::from_config(&config);
    let report = evaluate(&pipeline, &cases).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!(
        "{} Evaluated {} documents",
        style("ℹ").blue(),
        report.cases
    );
    println!();
    println!(
        "Classification Accuracy: {:.1}%",
        report.classification_accuracy * 100.0
    );
    print_field("Total Amount", &report.total_amount);
    print_field("Date", &report.date);
}

fn print_field(name: &str, metrics: &FieldMetrics) {
    println!(
        "{:<13}-> Precision: {:.2}, Recall: {:.2}, F1: {:.2}",
        name, metrics.precision, metrics.recall, metrics.f1
    );
}

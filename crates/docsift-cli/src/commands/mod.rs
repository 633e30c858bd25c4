pub mod batch;
pub mod config;
pub mod evaluate;
pub mod process;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use docsift_core::{DocsiftConfig, DocumentReport};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsift")
        .join("config.json")
}

/// Load the configuration given with `--config`, else the default file if
/// it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocsiftConfig> {
    if let Some(path) = config_path {
        return DocsiftConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        return DocsiftConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    Ok(DocsiftConfig::default())
}

/// JSON output for one processed document.
#[derive(Debug, Serialize)]
pub struct ProcessedDocument<'a> {
    pub file: String,
    pub processed_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub method: String,
    #[serde(flatten)]
    pub report: &'a DocumentReport,
}

impl<'a> ProcessedDocument<'a> {
    pub fn new(path: &Path, report: &'a DocumentReport, processing_time_ms: u64) -> Self {
        Self {
            file: path.display().to_string(),
            processed_at: Utc::now(),
            processing_time_ms,
            method: report.method(),
            report,
        }
    }
}

/// Format an optional amount for CSV and text output.
pub fn format_amount(amount: Option<f64>) -> String {
    amount.map(|a| format!("{:.2}", a)).unwrap_or_default()
}

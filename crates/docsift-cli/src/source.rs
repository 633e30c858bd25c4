//! Text sources: plain text files and PDFs with embedded text.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use docsift_core::models::config::IngestionConfig;

/// File extensions accepted as documents.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md"];

/// Whether a path has a supported document extension.
pub fn is_supported(path: &Path) -> bool {
    let ext = extension(path);
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load the plain text of a document.
///
/// Empty text is an error. Short text is returned with a warning since
/// the document is probably a scan.
pub fn load_text(path: &Path, ingestion: &IngestionConfig) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let ext = extension(path);
    let text = match ext.as_str() {
        "pdf" => extract_pdf_text(path)?,
        "txt" | "text" | "md" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => anyhow::bail!("Unsupported file format: {}", ext),
    };

    let length = text.trim().chars().count();
    debug!("Loaded {} characters from {}", length, path.display());

    if length == 0 {
        anyhow::bail!("No text could be extracted from {}", path.display());
    }

    if length < ingestion.min_text_length {
        warn!(
            "Low text density in {} ({} characters), OCR may be needed",
            path.display(),
            length
        );
    }

    Ok(text)
}

fn extract_pdf_text(path: &Path) -> anyhow::Result<String> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    // pdf_extract can panic on malformed documents
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&data));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(anyhow::anyhow!(
            "Failed to extract text from {}: {}",
            path.display(),
            e
        )),
        Err(_) => Err(anyhow::anyhow!(
            "PDF text extraction panicked on {} (malformed PDF)",
            path.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.txt");
        fs::write(&path, "Receipt\nTotal: $12.50\n").unwrap();

        let text = load_text(&path, &IngestionConfig::default()).unwrap();
        assert!(text.contains("$12.50"));
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, "  \n\t ").unwrap();

        let err = load_text(&path, &IngestionConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No text"));
    }

    #[test]
    fn test_unsupported_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("scan.png");
        fs::write(&image, [0u8; 4]).unwrap();

        assert!(!is_supported(&image));
        assert!(load_text(&image, &IngestionConfig::default()).is_err());
        assert!(load_text(&dir.path().join("missing.txt"), &IngestionConfig::default()).is_err());
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("a/INVOICE.PDF")));
        assert!(is_supported(Path::new("notes.md")));
        assert!(!is_supported(Path::new("archive.zip")));
        assert!(!is_supported(Path::new("no_extension")));
    }
}

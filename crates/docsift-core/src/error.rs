//! Error types for the docsift-core library.

use std::time::Duration;

use thiserror::Error;

/// Main error type for the docsift library.
#[derive(Error, Debug)]
pub enum DocsiftError {
    /// Statistical model loading error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Fallback extraction error.
    #[error("fallback error: {0}")]
    Fallback(#[from] FallbackError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to loading a statistical classifier model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The model file could not be read.
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),

    /// The model file is not valid JSON for the expected layout.
    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    /// Dimensions in the model file do not agree with each other.
    #[error("inconsistent model shape: {0}")]
    Shape(String),
}

/// Errors raised by a fallback extractor.
///
/// None of these ever leave the extraction orchestrator: every variant
/// degrades the outcome to the pattern-only result.
#[derive(Error, Debug)]
pub enum FallbackError {
    /// No client, credential or configuration is available.
    #[error("fallback unavailable: {0}")]
    Unavailable(String),

    /// Transport-level failure.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The response did not contain a usable field object.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The call did not finish in time.
    #[error("fallback timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for the docsift library.
pub type Result<T> = std::result::Result<T, DocsiftError>;

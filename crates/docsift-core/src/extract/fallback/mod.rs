//! Generative-model fallback extraction.
//!
//! The orchestrator consults a [`FallbackExtractor`] only when pattern
//! extraction left a critical field empty. Implementations may fail or
//! return an empty map; both leave the pattern result in place.

mod openai;
pub mod parsing;

pub use openai::OpenAiExtractor;

use async_trait::async_trait;

use crate::error::FallbackError;
use crate::models::fields::FieldMap;

/// Trait for fallback field extractors.
///
/// Implementations are shared across concurrent requests and must be
/// `Send + Sync`. Any input truncation required by the backing model is the
/// implementation's concern.
#[async_trait]
pub trait FallbackExtractor: Send + Sync {
    /// Extract fields from document text, using the category label as a hint.
    async fn extract(&self, text: &str, category_hint: &str) -> Result<FieldMap, FallbackError>;

    /// Short description for logs (model name, host, ...).
    fn name(&self) -> &str;
}

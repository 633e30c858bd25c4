//! Extraction orchestrator: pattern extraction with an optional fallback.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::FallbackError;
use crate::models::category::Category;
use crate::models::fields::{ExtractionOutcome, FieldMap};

use super::fallback::FallbackExtractor;
use super::pattern::PatternExtractor;

/// Decides when the fallback extractor is needed and merges its result.
///
/// The fallback runs at most once per [`resolve`](Self::resolve) call, only
/// when a critical field is missing. Every fallback problem degrades to the
/// pattern-only outcome.
pub struct ExtractionOrchestrator {
    patterns: PatternExtractor,
    fallback: Option<Arc<dyn FallbackExtractor>>,
    fallback_timeout: Option<Duration>,
}

impl ExtractionOrchestrator {
    /// Create an orchestrator with pattern extraction only.
    pub fn new() -> Self {
        Self {
            patterns: PatternExtractor::new(),
            fallback: None,
            fallback_timeout: None,
        }
    }

    /// Set the fallback extractor.
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackExtractor>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Bound the duration of the fallback call.
    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = Some(timeout);
        self
    }

    /// Whether a fallback extractor is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Extract fields from `text`, using `category` as the fallback hint.
    pub async fn resolve(&self, text: &str, category: Category) -> ExtractionOutcome {
        let base = self.patterns.extract(text);

        if base.is_complete() {
            debug!("Pattern extraction complete");
            return ExtractionOutcome::pattern(base);
        }

        let missing = base.missing_critical();
        let Some(fallback) = &self.fallback else {
            info!(
                "Missing {:?} but no fallback extractor is configured",
                missing
            );
            return ExtractionOutcome::pattern(base);
        };

        info!(
            "Missing {:?}, attempting fallback extraction with {}",
            missing,
            fallback.name()
        );

        match self.call_fallback(fallback.as_ref(), text, category).await {
            Ok(fields) if fields.is_empty() => {
                debug!("Fallback returned no fields");
                ExtractionOutcome::pattern(base)
            }
            Ok(fields) => {
                debug!("Fallback returned {} fields", fields.len());
                ExtractionOutcome::merged(base, fields)
            }
            Err(FallbackError::Unavailable(reason)) => {
                info!("Fallback unavailable: {}", reason);
                ExtractionOutcome::pattern(base)
            }
            Err(e) => {
                warn!("Fallback extraction failed: {}", e);
                ExtractionOutcome::pattern(base)
            }
        }
    }

    async fn call_fallback(
        &self,
        fallback: &dyn FallbackExtractor,
        text: &str,
        category: Category,
    ) -> Result<FieldMap, FallbackError> {
        let call = fallback.extract(text, category.label());

        match self.fallback_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| FallbackError::Timeout(limit))?,
            None => call.await,
        }
    }
}

impl Default for ExtractionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

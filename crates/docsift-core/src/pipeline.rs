//! Classification and extraction combined into one report per document.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{ClassificationRouter, RuleClassifier, StatisticalClassifier};
use crate::extract::{ExtractionOrchestrator, OpenAiExtractor};
use crate::models::category::{Category, ClassificationMethod};
use crate::models::config::DocsiftConfig;
use crate::models::fields::{ExtractionMethod, FieldMap};

/// Result of processing a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Decided document category.
    pub category: Category,
    /// Classification confidence (0.0 - 1.0).
    pub confidence: f64,
    /// Classifier that decided.
    pub classification_method: ClassificationMethod,
    /// Extracted fields.
    pub fields: FieldMap,
    /// Extractors that contributed.
    pub extraction_method: ExtractionMethod,
}

impl DocumentReport {
    /// Combined method descriptor, e.g. `rules + pattern`.
    pub fn method(&self) -> String {
        format!("{} + {}", self.classification_method, self.extraction_method)
    }
}

/// Document pipeline: classification router plus extraction orchestrator.
///
/// Holds no per-request state; share it behind an `Arc` to process
/// documents concurrently.
pub struct DocumentPipeline {
    router: ClassificationRouter,
    extractor: ExtractionOrchestrator,
}

impl DocumentPipeline {
    /// Assemble a pipeline from its parts.
    pub fn new(router: ClassificationRouter, extractor: ExtractionOrchestrator) -> Self {
        Self { router, extractor }
    }

    /// Build a pipeline from configuration.
    ///
    /// A missing statistical model or API key leaves the corresponding stage
    /// disabled rather than failing.
    pub fn from_config(config: &DocsiftConfig) -> Self {
        let classification = &config.classification;
        let mut router = ClassificationRouter::new(RuleClassifier::new())
            .with_rule_threshold(classification.rule_threshold);

        if classification.use_statistical {
            let statistical = match &classification.model_path {
                Some(path) => StatisticalClassifier::load(path),
                None => StatisticalClassifier::absent(),
            };
            router = router.with_statistical(statistical);
        }

        let extraction = &config.extraction;
        let mut extractor = ExtractionOrchestrator::new();

        if extraction.fallback_enabled {
            if let Some(client) = OpenAiExtractor::from_config(&extraction.fallback) {
                info!("LLM fallback enabled with model {}", extraction.fallback.model);
                extractor = extractor.with_fallback(Arc::new(client));
            }
            if extraction.fallback_timeout_secs > 0 {
                extractor = extractor
                    .with_fallback_timeout(Duration::from_secs(extraction.fallback_timeout_secs));
            }
        }

        Self::new(router, extractor)
    }

    /// Classify a document, then extract its fields using the category as hint.
    pub async fn classify_and_extract(&self, text: &str) -> DocumentReport {
        let decision = self.router.classify(text);
        debug!(
            "Classified as {} ({:.2}) by {}",
            decision.category, decision.confidence, decision.method
        );

        let outcome = self.extractor.resolve(text, decision.category).await;

        DocumentReport {
            category: decision.category,
            confidence: decision.confidence,
            classification_method: decision.method,
            fields: outcome.fields,
            extraction_method: outcome.method,
        }
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new(ClassificationRouter::default(), ExtractionOrchestrator::new())
    }
}

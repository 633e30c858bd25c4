//! Core library for financial document classification and field extraction.
//!
//! This crate provides:
//! - Keyword rule and statistical document classifiers behind a priority router
//! - Pattern-based extraction of total amount and date
//! - An extraction orchestrator with an optional LLM fallback
//! - A pipeline entry point combining both decisions into a single report
//! - Field-level evaluation metrics over labelled documents

pub mod classify;
pub mod error;
pub mod evaluation;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod text;

pub use classify::{
    Classification, ClassificationRouter, DocumentClassifier, LinearTextModel, RuleClassifier,
    StatisticalClassifier,
};
pub use error::{DocsiftError, FallbackError, ModelError, Result};
pub use extract::{
    ExtractionOrchestrator, FallbackExtractor, OpenAiExtractor, PatternExtractor,
};
pub use models::category::{Category, ClassificationDecision, ClassificationMethod};
pub use models::config::DocsiftConfig;
pub use models::fields::{ExtractionMethod, ExtractionOutcome, FieldMap};
pub use pipeline::{DocumentPipeline, DocumentReport};

//! Field-level evaluation over labelled documents.
//!
//! Scoring is strict: a present but wrong value counts both as a false
//! positive and as a false negative.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::category::Category;
use crate::models::fields::{DATE, FieldMap, TOTAL_AMOUNT};
use crate::pipeline::DocumentPipeline;

/// Tolerance for comparing numeric field values.
const NUMERIC_EPSILON: f64 = 1e-6;

/// A labelled document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCase {
    /// Document text.
    pub text: String,
    /// Expected category.
    pub category: Category,
    /// Expected fields; absent keys are expected to stay empty.
    #[serde(default)]
    pub expected: FieldMap,
}

/// Precision, recall and F1 for one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl FieldMetrics {
    fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
        }
    }
}

/// Aggregate evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Number of evaluated cases.
    pub cases: usize,
    /// Fraction of cases with the expected category.
    pub classification_accuracy: f64,
    pub total_amount: FieldMetrics,
    pub date: FieldMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn values_match(predicted: &Value, expected: &Value) -> bool {
    match (predicted.as_f64(), expected.as_f64()) {
        (Some(p), Some(e)) => (p - e).abs() < NUMERIC_EPSILON,
        _ => predicted == expected,
    }
}

/// Score one field over `(predicted, expected)` pairs.
pub fn score_field<'a, I>(pairs: I) -> FieldMetrics
where
    I: IntoIterator<Item = (Option<&'a Value>, Option<&'a Value>)>,
{
    let (mut tp, mut fp, mut fn_) = (0, 0, 0);

    for (predicted, expected) in pairs {
        match (predicted, expected) {
            (None, None) => {}
            (Some(p), Some(e)) if values_match(p, e) => tp += 1,
            (None, Some(_)) => fn_ += 1,
            (Some(_), None) => fp += 1,
            (Some(_), Some(_)) => {
                fp += 1;
                fn_ += 1;
            }
        }
    }

    FieldMetrics::from_counts(tp, fp, fn_)
}

/// Load labelled cases from a JSON array file.
pub fn load_cases(path: &Path) -> Result<Vec<EvaluationCase>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Run the pipeline over every case and score the results.
pub async fn evaluate(pipeline: &DocumentPipeline, cases: &[EvaluationCase]) -> EvaluationReport {
    let mut correct = 0;
    let mut predictions = Vec::with_capacity(cases.len());

    for case in cases {
        let report = pipeline.classify_and_extract(&case.text).await;
        if report.category == case.category {
            correct += 1;
        } else {
            debug!(
                "Misclassified as {} (expected {}): {:.40}",
                report.category, case.category, case.text
            );
        }
        predictions.push(report.fields);
    }

    let field_metrics = |key: &str| {
        let predicted: Vec<Option<Value>> = predictions.iter().map(|f| f.get(key)).collect();
        let expected: Vec<Option<Value>> = cases.iter().map(|c| c.expected.get(key)).collect();
        score_field(predicted.iter().map(Option::as_ref).zip(expected.iter().map(Option::as_ref)))
    };

    EvaluationReport {
        cases: cases.len(),
        classification_accuracy: ratio(correct, cases.len()),
        total_amount: field_metrics(TOTAL_AMOUNT),
        date: field_metrics(DATE),
    }
}

//! Statistical classifier backed by an exported linear text model.
//!
//! The model is a TF-IDF weighted bag of words followed by a logistic
//! regression layer, serialized as JSON:
//!
//! ```json
//! {
//!   "classes": ["Bank Statement", "Invoice", "Receipt"],
//!   "vocabulary": {"balance": 0, "invoice": 1},
//!   "idf": [1.4, 1.1],
//!   "coef": [[0.9, -0.2], [-0.3, 1.7], [-0.6, -1.5]],
//!   "intercept": [0.1, 0.0, -0.1]
//! }
//! ```
//!
//! A binary model carries a single `coef` row scoring the second class.
//! Training happens offline and is not part of this crate.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ModelError;
use crate::models::category::Category;

use super::{Classification, DocumentClassifier};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Inference-only TF-IDF + logistic regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTextModel {
    /// Class labels, in the column order of the probability output.
    pub classes: Vec<String>,
    /// Term to feature column.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature column.
    pub idf: Vec<f64>,
    /// One weight row per class (or a single row for binary models).
    pub coef: Vec<Vec<f64>>,
    /// Bias per weight row.
    pub intercept: Vec<f64>,
}

impl LinearTextModel {
    /// Load a model from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a model from JSON and validate its dimensions.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        let n_classes = self.classes.len();
        let n_features = self.idf.len();

        if n_classes < 2 {
            return Err(ModelError::Shape(format!(
                "expected at least 2 classes, got {}",
                n_classes
            )));
        }

        if let Some((term, &col)) = self.vocabulary.iter().find(|(_, col)| **col >= n_features) {
            return Err(ModelError::Shape(format!(
                "term '{}' maps to column {} but idf has {} entries",
                term, col, n_features
            )));
        }

        let expected_rows = if n_classes == 2 && self.coef.len() == 1 {
            1
        } else {
            n_classes
        };
        if self.coef.len() != expected_rows {
            return Err(ModelError::Shape(format!(
                "expected {} coefficient rows for {} classes, got {}",
                expected_rows,
                n_classes,
                self.coef.len()
            )));
        }

        if let Some(row) = self.coef.iter().position(|r| r.len() != n_features) {
            return Err(ModelError::Shape(format!(
                "coefficient row {} has {} entries, expected {}",
                row,
                self.coef[row].len(),
                n_features
            )));
        }

        if self.intercept.len() != self.coef.len() {
            return Err(ModelError::Shape(format!(
                "expected {} intercepts, got {}",
                self.coef.len(),
                self.intercept.len()
            )));
        }

        Ok(())
    }

    /// L2-normalized TF-IDF features as sparse (column, weight) pairs.
    fn features(&self, text: &str) -> Vec<(usize, f64)> {
        let lowered = text.to_lowercase();
        let mut counts: HashMap<usize, f64> = HashMap::new();

        for token in TOKEN.find_iter(&lowered) {
            if let Some(&col) = self.vocabulary.get(token.as_str()) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, count)| (col, count * self.idf.get(col).copied().unwrap_or(0.0)))
            .collect();

        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weighted {
                *w /= norm;
            }
        }

        weighted
    }

    /// Class probabilities, aligned with `classes`.
    pub fn predict_proba(&self, text: &str) -> Vec<f64> {
        let features = self.features(text);

        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| {
                features
                    .iter()
                    .map(|(col, w)| row.get(*col).copied().unwrap_or(0.0) * w)
                    .sum::<f64>()
                    + bias
            })
            .collect();

        if scores.len() == 1 {
            let positive = 1.0 / (1.0 + (-scores[0]).exp());
            return vec![1.0 - positive, positive];
        }

        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }

    /// Most probable class label and its probability.
    pub fn predict(&self, text: &str) -> Option<(&str, f64)> {
        self.predict_proba(text)
            .into_iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .and_then(|(idx, p)| self.classes.get(idx).map(|label| (label.as_str(), p)))
    }
}

/// Handle to an optional statistical model.
///
/// Built once at startup. Without a model every prediction is
/// `(Unknown, 0.0)`.
#[derive(Debug, Clone, Default)]
pub struct StatisticalClassifier {
    model: Option<LinearTextModel>,
}

impl StatisticalClassifier {
    /// Classifier with no model loaded.
    pub fn absent() -> Self {
        Self { model: None }
    }

    /// Classifier around an already loaded model.
    pub fn from_model(model: LinearTextModel) -> Self {
        Self { model: Some(model) }
    }

    /// Load a model file, propagating load errors.
    pub fn try_load(path: &Path) -> Result<Self, ModelError> {
        LinearTextModel::from_file(path).map(Self::from_model)
    }

    /// Load a model file, falling back to an absent model on any error.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(classifier) => {
                info!("Loaded statistical model from {}", path.display());
                classifier
            }
            Err(ModelError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No statistical model at {}", path.display());
                Self::absent()
            }
            Err(e) => {
                warn!("Ignoring statistical model at {}: {}", path.display(), e);
                Self::absent()
            }
        }
    }

    /// Whether a model is available.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}

impl DocumentClassifier for StatisticalClassifier {
    fn classify(&self, text: &str) -> Classification {
        let Some(model) = &self.model else {
            debug!("Statistical classifier has no model");
            return Classification::unknown();
        };

        match model.predict(text) {
            Some((label, probability)) => {
                debug!("Statistical model predicted '{}' ({:.3})", label, probability);
                Classification::new(Category::from_label(label), probability)
            }
            None => Classification::unknown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_CLASS_MODEL: &str = r#"{
        "classes": ["Bank Statement", "Invoice", "Receipt"],
        "vocabulary": {"deposits": 0, "withdrawals": 1, "invoice": 2, "paid": 3},
        "idf": [1.0, 1.0, 1.0, 1.0],
        "coef": [
            [2.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 2.0]
        ],
        "intercept": [0.0, 0.0, 0.0]
    }"#;

    const BINARY_MODEL: &str = r#"{
        "classes": ["Invoice", "Receipt"],
        "vocabulary": {"paid": 0},
        "idf": [1.0],
        "coef": [[3.0]],
        "intercept": [-1.0]
    }"#;

    #[test]
    fn test_multiclass_prediction() {
        let model = LinearTextModel::from_json(THREE_CLASS_MODEL).unwrap();
        let classifier = StatisticalClassifier::from_model(model);

        let result = classifier.classify("Account ending in 4455. Monthly withdrawals and deposits.");
        assert_eq!(result.category, Category::BankStatement);
        assert!(result.confidence > 0.8 && result.confidence < 1.0);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = LinearTextModel::from_json(THREE_CLASS_MODEL).unwrap();
        let probs = model.predict_proba("invoice paid");

        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!((probs[1] - probs[2]).abs() < 1e-9);
    }

    #[test]
    fn test_binary_model_uses_sigmoid() {
        let model = LinearTextModel::from_json(BINARY_MODEL).unwrap();

        let (label, p) = model.predict("Paid in full").unwrap();
        assert_eq!(label, "Receipt");
        assert!((p - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-9);

        let (label, p) = model.predict("nothing relevant").unwrap();
        assert_eq!(label, "Invoice");
        assert!((p - (1.0 - 1.0 / (1.0 + 1.0f64.exp()))).abs() < 1e-9);
    }

    #[test]
    fn test_shape_validation() {
        let bad = r#"{
            "classes": ["Invoice", "Receipt", "Bank Statement"],
            "vocabulary": {"paid": 3},
            "idf": [1.0],
            "coef": [[1.0], [1.0], [1.0]],
            "intercept": [0.0, 0.0, 0.0]
        }"#;
        assert!(matches!(LinearTextModel::from_json(bad), Err(ModelError::Shape(_))));

        let bad_rows = r#"{
            "classes": ["Invoice", "Receipt", "Bank Statement"],
            "vocabulary": {},
            "idf": [1.0],
            "coef": [[1.0]],
            "intercept": [0.0]
        }"#;
        assert!(matches!(LinearTextModel::from_json(bad_rows), Err(ModelError::Shape(_))));
    }

    #[test]
    fn test_absent_model_degrades_to_unknown() {
        let classifier = StatisticalClassifier::absent();
        assert!(!classifier.is_loaded());

        let result = classifier.classify("Invoice total $10.00");
        assert_eq!(result, Classification::unknown());
    }

    #[test]
    fn test_load_missing_or_invalid_file() {
        let dir = tempfile::tempdir().unwrap();

        let missing = StatisticalClassifier::load(&dir.path().join("nope.json"));
        assert!(!missing.is_loaded());

        let invalid_path = dir.path().join("invalid.json");
        std::fs::write(&invalid_path, "not json").unwrap();
        assert!(!StatisticalClassifier::load(&invalid_path).is_loaded());
        assert!(matches!(
            StatisticalClassifier::try_load(&invalid_path),
            Err(ModelError::Parse(_))
        ));

        let valid_path = dir.path().join("model.json");
        std::fs::write(&valid_path, THREE_CLASS_MODEL).unwrap();
        assert!(StatisticalClassifier::load(&valid_path).is_loaded());
    }

    #[test]
    fn test_unrecognized_label_maps_to_unknown() {
        let json = BINARY_MODEL.replace("\"Receipt\"", "\"Payslip\"");
        let classifier = StatisticalClassifier::from_model(LinearTextModel::from_json(&json).unwrap());

        let result = classifier.classify("paid");
        assert_eq!(result.category, Category::Unknown);
        assert!(result.confidence > 0.5);
    }
}

//! Priority routing between rule and statistical classifiers.

use tracing::debug;

use crate::models::category::{ClassificationDecision, ClassificationMethod};

use super::{DocumentClassifier, RuleClassifier};

/// Rule confidence from which keyword rules decide alone (two matched phrases).
pub const DEFAULT_RULE_THRESHOLD: f64 = 0.6;

/// Classification router.
///
/// Rules run first and win outright when confident. Otherwise the
/// statistical classifier, if configured, decides verbatim. The two signals
/// are never blended.
pub struct ClassificationRouter {
    rules: RuleClassifier,
    statistical: Option<Box<dyn DocumentClassifier>>,
    rule_threshold: f64,
}

impl ClassificationRouter {
    /// Create a router with only keyword rules.
    pub fn new(rules: RuleClassifier) -> Self {
        Self {
            rules,
            statistical: None,
            rule_threshold: DEFAULT_RULE_THRESHOLD,
        }
    }

    /// Add the statistical classifier consulted when rules are not confident.
    pub fn with_statistical(mut self, classifier: impl DocumentClassifier + 'static) -> Self {
        self.statistical = Some(Box::new(classifier));
        self
    }

    /// Set the rule confidence threshold.
    pub fn with_rule_threshold(mut self, threshold: f64) -> Self {
        self.rule_threshold = threshold;
        self
    }

    /// Whether a statistical classifier is configured.
    pub fn has_statistical(&self) -> bool {
        self.statistical.is_some()
    }

    /// Decide the category of a document.
    pub fn classify(&self, text: &str) -> ClassificationDecision {
        let by_rules = self.rules.classify(text);

        if by_rules.confidence >= self.rule_threshold {
            debug!(
                "Rules decided {} ({:.2})",
                by_rules.category, by_rules.confidence
            );
            return ClassificationDecision::new(
                by_rules.category,
                by_rules.confidence,
                ClassificationMethod::Rules,
            );
        }

        match &self.statistical {
            Some(classifier) => {
                let result = classifier.classify(text);
                debug!(
                    "Rules below threshold ({:.2}), statistical decided {} ({:.2})",
                    by_rules.confidence, result.category, result.confidence
                );
                ClassificationDecision::new(
                    result.category,
                    result.confidence,
                    ClassificationMethod::Statistical,
                )
            }
            None => {
                debug!("Rules below threshold and no statistical classifier configured");
                ClassificationDecision::undecided()
            }
        }
    }
}

impl Default for ClassificationRouter {
    fn default() -> Self {
        Self::new(RuleClassifier::new())
    }
}

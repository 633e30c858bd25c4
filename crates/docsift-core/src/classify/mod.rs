//! Document classification.
//!
//! Two classifiers implement [`DocumentClassifier`]: keyword rules and a
//! statistical text model. [`ClassificationRouter`] arbitrates between them.

mod router;
pub mod rules;
pub mod statistical;

pub use router::ClassificationRouter;
pub use rules::RuleClassifier;
pub use statistical::{LinearTextModel, StatisticalClassifier};

use crate::models::category::Category;

/// A category guess with its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Predicted category.
    pub category: Category,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f64,
}

impl Classification {
    pub fn new(category: Category, confidence: f64) -> Self {
        Self {
            category,
            confidence,
        }
    }

    /// Nothing recognized.
    pub fn unknown() -> Self {
        Self::new(Category::Unknown, 0.0)
    }
}

/// Trait for document classifiers.
///
/// Implementations never fail: when they cannot predict they return
/// [`Classification::unknown`].
pub trait DocumentClassifier: Send + Sync {
    /// Classify a document from its plain text.
    fn classify(&self, text: &str) -> Classification;
}

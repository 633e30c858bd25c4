//! Document categories and classification decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of financial document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Invoice / bill.
    Invoice,
    /// Payment receipt.
    Receipt,
    /// Bank account statement.
    #[serde(rename = "Bank Statement")]
    BankStatement,
    /// Anything that could not be recognized.
    Unknown,
}

impl Category {
    /// Known categories in taxonomy order. `Unknown` is not part of it.
    pub const TAXONOMY: [Category; 3] = [Category::Invoice, Category::Receipt, Category::BankStatement];

    /// Human-readable label, also used as the hint for fallback extraction.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Invoice => "Invoice",
            Category::Receipt => "Receipt",
            Category::BankStatement => "Bank Statement",
            Category::Unknown => "Unknown",
        }
    }

    /// Parse a label produced by a classifier or written in a dataset.
    ///
    /// Unrecognized labels map to `Unknown`.
    pub fn from_label(s: &str) -> Self {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match normalized.as_str() {
            "invoice" => Category::Invoice,
            "receipt" => Category::Receipt,
            "bankstatement" | "statement" => Category::BankStatement,
            _ => Category::Unknown,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Strategy that produced a classification decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Keyword rules were confident enough.
    Rules,
    /// Statistical classifier output.
    Statistical,
    /// No classifier could decide.
    None,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Rules => "rules",
            ClassificationMethod::Statistical => "statistical",
            ClassificationMethod::None => "none",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final classification of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationDecision {
    /// Decided category.
    pub category: Category,
    /// Confidence (0.0 - 1.0).
    pub confidence: f64,
    /// Which classifier decided.
    pub method: ClassificationMethod,
}

impl ClassificationDecision {
    pub fn new(category: Category, confidence: f64, method: ClassificationMethod) -> Self {
        Self {
            category,
            confidence,
            method,
        }
    }

    /// Decision used when nothing could classify the document.
    pub fn undecided() -> Self {
        Self::new(Category::Unknown, 0.0, ClassificationMethod::None)
    }
}

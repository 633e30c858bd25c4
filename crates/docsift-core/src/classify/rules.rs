//! Keyword rule classifier.

use crate::models::category::Category;

use super::{Classification, DocumentClassifier};

/// Confidence contributed by each matched trigger phrase.
pub const PHRASE_WEIGHT: f64 = 0.3;

/// Rule confidence never reaches certainty.
pub const MAX_RULE_CONFIDENCE: f64 = 0.95;

const INVOICE_TRIGGERS: &[&str] = &[
    "invoice",
    "invoice #",
    "invoice number",
    "bill to",
    "due date",
    "balance due",
    "amount due",
];

const RECEIPT_TRIGGERS: &[&str] = &[
    "receipt",
    "payment received",
    "transaction",
    "card number",
    "thank you for your purchase",
    "change due",
];

const BANK_STATEMENT_TRIGGERS: &[&str] = &[
    "statement",
    "bank statement",
    "account summary",
    "opening balance",
    "closing balance",
    "ending balance",
];

/// Classifier scoring each category by the number of its trigger phrases
/// found in the text.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<(Category, Vec<String>)>,
}

impl RuleClassifier {
    /// Create a classifier with the built-in taxonomy.
    pub fn new() -> Self {
        let rules = Category::TAXONOMY
            .iter()
            .map(|&category| {
                let triggers = match category {
                    Category::Invoice => INVOICE_TRIGGERS,
                    Category::Receipt => RECEIPT_TRIGGERS,
                    Category::BankStatement => BANK_STATEMENT_TRIGGERS,
                    Category::Unknown => &[],
                };
                (category, triggers.iter().map(|t| t.to_string()).collect())
            })
            .collect();

        Self { rules }
    }

    /// Create a classifier from custom rules.
    ///
    /// Order matters: ties between equal counts go to the earlier category.
    /// Phrases are matched case-insensitively.
    pub fn with_rules(rules: Vec<(Category, Vec<String>)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(category, phrases)| {
                let mut lowered: Vec<String> = Vec::with_capacity(phrases.len());
                for phrase in phrases {
                    let phrase = phrase.to_lowercase();
                    if !phrase.is_empty() && !lowered.contains(&phrase) {
                        lowered.push(phrase);
                    }
                }
                (category, lowered)
            })
            .collect();

        Self { rules }
    }

    /// Number of distinct trigger phrases of each category present in `text`.
    pub fn scores(&self, text: &str) -> Vec<(Category, usize)> {
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .map(|(category, phrases)| {
                let count = phrases.iter().filter(|p| lowered.contains(p.as_str())).count();
                (*category, count)
            })
            .collect()
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentClassifier for RuleClassifier {
    fn classify(&self, text: &str) -> Classification {
        let mut best: Option<(Category, usize)> = None;

        for (category, count) in self.scores(text) {
            // Strictly greater keeps the first category on ties
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((category, count));
            }
        }

        match best {
            Some((category, count)) => {
                let confidence = (PHRASE_WEIGHT * count as f64).min(MAX_RULE_CONFIDENCE);
                Classification::new(category, confidence)
            }
            None => Classification::unknown(),
        }
    }
}

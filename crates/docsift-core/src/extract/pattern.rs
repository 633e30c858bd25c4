//! Deterministic extraction of the critical fields.

use tracing::debug;

use crate::models::fields::FieldMap;
use crate::text::normalize_whitespace;

use super::rules::{AmountExtractor, DateExtractor, FieldExtractor};

/// Pattern extractor producing `total_amount` and `date`.
///
/// Stateless; never fails. Fields it cannot find are left empty.
#[derive(Default)]
pub struct PatternExtractor {
    amounts: AmountExtractor,
    dates: DateExtractor,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract critical fields from raw document text.
    pub fn extract(&self, text: &str) -> FieldMap {
        let normalized = normalize_whitespace(text);
        let mut fields = FieldMap::new();

        if let Some(amount) = self.amounts.extract(&normalized) {
            debug!("Total amount {} from {} '{}'", amount.value, amount.pattern, amount.source);
            fields.total_amount = Some(amount.value);
        }

        if let Some(date) = self.dates.extract(&normalized) {
            debug!("Date '{}' from {}", date.value, date.pattern);
            fields.date = Some(date.value);
        }

        fields
    }
}

//! Total amount extraction.

use regex::Regex;
use tracing::trace;

use crate::text::parse_amount;

use super::patterns::{CURRENCY_AMOUNT, TOTAL_LABELED};
use super::{ExtractionMatch, FieldExtractor};

/// Total amount extractor.
///
/// Patterns are tried from most to least specific. Within a pattern the
/// last occurrence wins, since grand totals sit near the end of a document.
/// A match that does not parse falls through to the next pattern.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    fn patterns() -> [(&'static str, &'static Regex); 2] {
        [
            ("labeled_total", &*TOTAL_LABELED),
            ("currency_amount", &*CURRENCY_AMOUNT),
        ]
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = f64;

    fn extract(&self, text: &str) -> Option<ExtractionMatch<f64>> {
        for (name, pattern) in Self::patterns() {
            let Some(caps) = pattern.captures_iter(text).last() else {
                continue;
            };
            let (Some(full_match), Some(token)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            // The match may end on the character after the amount
            let (start, end) = (full_match.start(), token.end());

            match parse_amount(token.as_str()) {
                Some(amount) => {
                    return Some(
                        ExtractionMatch::new(amount, name, &text[start..end])
                            .with_position(start, end),
                    );
                }
                None => {
                    trace!("Pattern {} matched unparsable amount '{}'", name, token.as_str());
                }
            }
        }

        None
    }
}

//! Document date extraction.

use regex::Regex;

use super::patterns::{DATE_ISO, DATE_MONTH_NAME, DATE_SLASHED};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Returns the first occurrence of the first matching format, as written in
/// the text. Dates are not converted to a calendar type.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn patterns() -> [(&'static str, &'static Regex); 3] {
        [
            ("iso_date", &*DATE_ISO),
            ("slashed_date", &*DATE_SLASHED),
            ("month_name_date", &*DATE_MONTH_NAME),
        ]
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        Self::patterns().into_iter().find_map(|(name, pattern)| {
            pattern.find(text).map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), name, m.as_str())
                    .with_position(m.start(), m.end())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_date(text: &str) -> Option<String> {
        DateExtractor::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(
            extract_date("Invoice #123. Date: 2023-01-01. Total: $500.00"),
            Some("2023-01-01".to_string())
        );
    }

    #[test]
    fn test_slashed_date() {
        assert_eq!(
            extract_date("Paid $20.00 on 12/12/2023."),
            Some("12/12/2023".to_string())
        );
        assert_eq!(extract_date("on 1/2/2024"), Some("1/2/2024".to_string()));
    }

    #[test]
    fn test_month_name_date() {
        assert_eq!(extract_date("Issued Dec 1, 2023"), Some("Dec 1, 2023".to_string()));
        assert_eq!(
            extract_date("issued DECEMBER 15 2023"),
            Some("DECEMBER 15 2023".to_string())
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(
            extract_date("Issued 2023-01-01, due 2023-02-01"),
            Some("2023-01-01".to_string())
        );
    }

    #[test]
    fn test_format_priority_over_position() {
        // The slashed date comes first in the text, but ISO is tried first
        let result = DateExtractor::new()
            .extract("Paid 12/12/2023, posted 2023-12-15")
            .unwrap();

        assert_eq!(result.value, "2023-12-15");
        assert_eq!(result.pattern, "iso_date");
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("Bank Statement. Ending Balance $1000.00."), None);
        assert_eq!(extract_date("Ref 12/2023"), None);
    }
}

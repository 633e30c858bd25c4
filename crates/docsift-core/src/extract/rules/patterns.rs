//! Common regex patterns for financial document extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amounts always carry exactly two decimals. The capture is followed by a
    // non-digit or the end of text, so "500.00USD" still matches.

    // Totals anchored by a trigger phrase: "Total: $500.00", "Amount Due 1,250.50",
    // "Total Due: 1500.00"
    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?i)\b(?:grand\s+total|total|amount\s+due|balance\s+due)[\sA-Za-z]*?:?\s*[$€£]?\s*((?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})(?:\D|$)"
    ).unwrap();

    // Any currency-prefixed amount; integer parts above three digits need
    // comma separators here ("$1000.00" does not match)
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"[$€£]\s*(\d{1,3}(?:,\d{3})*\.\d{2})(?:\D|$)"
    ).unwrap();

    // 2023-12-01
    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b\d{4}-\d{2}-\d{2}\b"
    ).unwrap();

    // 01/12/2023, day/month order is ambiguous
    pub static ref DATE_SLASHED: Regex = Regex::new(
        r"\b\d{1,2}/\d{1,2}/\d{4}\b"
    ).unwrap();

    // Dec 1, 2023 / December 1 2023
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b"
    ).unwrap();
}

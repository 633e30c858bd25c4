//! Extracted field maps and extraction outcomes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::text::parse_amount;

/// Key of the total amount field.
pub const TOTAL_AMOUNT: &str = "total_amount";
/// Key of the document date field.
pub const DATE: &str = "date";

/// Fields extracted from a document.
///
/// `total_amount` and `date` are the critical fields; everything else
/// (vendor, currency, ...) is passed through from the fallback extractor.
/// A key is either present with a value or absent. Passthrough nulls that
/// arrive through deserialization count as absent everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    /// Grand total of the document.
    pub total_amount: Option<f64>,

    /// Document date, exactly as it appeared in the text.
    pub date: Option<String>,

    /// Passthrough fields.
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both critical fields are present.
    pub fn is_complete(&self) -> bool {
        self.total_amount.is_some() && self.date.is_some()
    }

    /// No field at all is present.
    pub fn is_empty(&self) -> bool {
        self.total_amount.is_none() && self.date.is_none() && self.extra().next().is_none()
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        usize::from(self.total_amount.is_some()) + usize::from(self.date.is_some()) + self.extra().count()
    }

    /// Names of the critical fields that are still missing.
    pub fn missing_critical(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.total_amount.is_none() {
            missing.push(TOTAL_AMOUNT);
        }
        if self.date.is_none() {
            missing.push(DATE);
        }
        missing
    }

    /// Look up any field as a JSON value.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            TOTAL_AMOUNT => self.total_amount.map(Value::from),
            DATE => self.date.clone().map(Value::from),
            other => self.extra.get(other).filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Present passthrough fields in key order.
    pub fn extra(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extra
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Set a passthrough field. Null values remove the key.
    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if value.is_null() {
            self.extra.remove(&key);
        } else {
            self.extra.insert(key, value);
        }
    }

    /// Overlay `other` onto `self`.
    ///
    /// Every key present in `other` replaces the value in `self`; keys absent
    /// from `other`, or null there, keep their current value.
    pub fn overlay(&mut self, other: FieldMap) {
        if other.total_amount.is_some() {
            self.total_amount = other.total_amount;
        }
        if other.date.is_some() {
            self.date = other.date;
        }
        for (key, value) in other.extra {
            if !value.is_null() {
                self.extra.insert(key, value);
            }
        }
    }

    /// Build a field map from a loosely typed JSON object.
    ///
    /// Nulls are dropped. `total_amount` may be a number or a currency string
    /// and is discarded when it cannot be read as a number. `date` may be any
    /// scalar and is kept as text.
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        let mut fields = FieldMap::new();

        for (key, value) in object {
            if value.is_null() {
                continue;
            }

            match key.as_str() {
                TOTAL_AMOUNT => {
                    let amount = match &value {
                        Value::Number(n) => n.as_f64(),
                        Value::String(s) => parse_amount(s),
                        _ => None,
                    };
                    match amount {
                        Some(amount) => fields.total_amount = Some(amount),
                        None => warn!("Ignoring unreadable total_amount value: {}", value),
                    }
                }
                DATE => {
                    let date = match value {
                        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    };
                    if date.is_some() {
                        fields.date = date;
                    }
                }
                _ => fields.set_extra(key, value),
            }
        }

        fields
    }
}

/// Which extractors contributed to an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// Pattern extraction alone.
    #[serde(rename = "pattern")]
    Pattern,
    /// Pattern extraction merged with fallback fields.
    #[serde(rename = "pattern+fallback")]
    PatternWithFallback,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Pattern => "pattern",
            ExtractionMethod::PatternWithFallback => "pattern+fallback",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final extraction result for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// Extracted fields.
    pub fields: FieldMap,
    /// Extractors that contributed.
    pub method: ExtractionMethod,
}

impl ExtractionOutcome {
    /// Outcome built from pattern extraction only.
    pub fn pattern(fields: FieldMap) -> Self {
        Self {
            fields,
            method: ExtractionMethod::Pattern,
        }
    }

    /// Outcome with fallback fields overlaid on the pattern fields.
    pub fn merged(mut base: FieldMap, fallback: FieldMap) -> Self {
        base.overlay(fallback);
        Self {
            fields: base,
            method: ExtractionMethod::PatternWithFallback,
        }
    }
}

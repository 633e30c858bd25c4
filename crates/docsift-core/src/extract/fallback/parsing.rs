//! JSON parsing helpers for fallback model responses.
//!
//! Models often wrap the JSON payload in prose or code fences, so the
//! outermost `{...}` span is located before parsing.

use serde_json::Value;

use crate::error::FallbackError;
use crate::models::fields::FieldMap;
use crate::text::truncate_chars;

const RAW_PREVIEW_CHARS: usize = 200;

/// Parse a field object out of a model response.
pub fn parse_fields_response(response: &str) -> Result<FieldMap, FallbackError> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            let value: Value = serde_json::from_str(json_str).map_err(|e| {
                FallbackError::MalformedResponse(format!(
                    "invalid JSON: {} | Raw: {}",
                    e,
                    preview(json_str)
                ))
            })?;

            match value {
                Value::Object(object) => Ok(FieldMap::from_json_object(object)),
                other => Err(FallbackError::MalformedResponse(format!(
                    "expected a JSON object, got {}",
                    preview(&other.to_string())
                ))),
            }
        }
        _ => Err(FallbackError::MalformedResponse(format!(
            "no JSON found | Raw: {}",
            preview(response)
        ))),
    }
}

fn preview(s: &str) -> String {
    let truncated = truncate_chars(s, RAW_PREVIEW_CHARS);
    if truncated.len() < s.len() {
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let fields = parse_fields_response(
            r#"{"total_amount": 1200.5, "date": "2024-01-01", "vendor": "Acme", "currency": "USD"}"#,
        )
        .unwrap();

        assert_eq!(fields.total_amount, Some(1200.5));
        assert_eq!(fields.date.as_deref(), Some("2024-01-01"));
        assert_eq!(fields.get("vendor"), Some(json!("Acme")));
        assert_eq!(fields.get("currency"), Some(json!("USD")));
    }

    #[test]
    fn test_fenced_object() {
        let response = "Here you go:\n```json\n{\"total_amount\": \"$9.99\", \"date\": null}\n```";
        let fields = parse_fields_response(response).unwrap();

        assert_eq!(fields.total_amount, Some(9.99));
        assert_eq!(fields.date, None);
    }

    #[test]
    fn test_all_null_is_empty() {
        let fields =
            parse_fields_response(r#"{"total_amount": null, "date": null, "vendor": null}"#).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            parse_fields_response("I could not find anything."),
            Err(FallbackError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_fields_response("{not json}"),
            Err(FallbackError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_long_raw_is_truncated() {
        let response = format!("{{{}", "x".repeat(500));
        let err = parse_fields_response(&format!("{}}}", response)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("..."));
        assert!(message.len() < 400);
    }
}

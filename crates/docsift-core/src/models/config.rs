//! Configuration structures for the document pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsiftError, Result};

/// Main configuration for the docsift pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsiftConfig {
    /// Classification configuration.
    pub classification: ClassificationConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Text ingestion configuration.
    pub ingestion: IngestionConfig,
}

/// Classifier routing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Rule confidence at or above which keyword rules decide alone.
    pub rule_threshold: f64,

    /// Consult the statistical classifier when rules are not confident.
    pub use_statistical: bool,

    /// Exported statistical model (JSON). Missing file means no model.
    pub model_path: Option<PathBuf>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            rule_threshold: 0.6,
            use_statistical: true,
            model_path: Some(PathBuf::from("models/classifier.json")),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Allow the LLM fallback when critical fields are missing.
    pub fallback_enabled: bool,

    /// Upper bound on a single fallback call, in seconds (0 = no limit).
    pub fallback_timeout_secs: u64,

    /// LLM client settings.
    pub fallback: FallbackConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            fallback_timeout_secs: 30,
            fallback: FallbackConfig::default(),
        }
    }
}

/// OpenAI-compatible chat completions client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Server base URL, without the `/v1/...` path.
    pub base_url: String,

    /// Model name.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum number of document characters sent to the model.
    pub max_input_chars: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo-1106".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.1,
            max_input_chars: 4000,
        }
    }
}

/// Text ingestion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Below this many characters (after trimming) the text is treated as
    /// low density, probably a scan that needs OCR.
    pub min_text_length: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self { min_text_length: 50 }
    }
}

impl DocsiftConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.classification.rule_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(DocsiftError::Config(format!(
                "classification.rule_threshold must be within 0.0..=1.0, got {}",
                threshold
            )));
        }
        if self.extraction.fallback.max_input_chars == 0 {
            return Err(DocsiftError::Config(
                "extraction.fallback.max_input_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = DocsiftConfig::default();
        assert_eq!(config.classification.rule_threshold, 0.6);
        assert_eq!(config.extraction.fallback.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.extraction.fallback.max_input_chars, 4000);
        assert_eq!(config.ingestion.min_text_length, 50);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: DocsiftConfig =
            serde_json::from_str(r#"{"extraction": {"fallback_enabled": false}}"#).unwrap();

        assert!(!config.extraction.fallback_enabled);
        assert_eq!(config.extraction.fallback_timeout_secs, 30);
        assert_eq!(config.classification, ClassificationConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocsiftConfig::default();
        config.classification.use_statistical = false;
        config.extraction.fallback.model = "local-model".to_string();
        config.save(&path).unwrap();

        let loaded = DocsiftConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"classification": {"rule_threshold": 1.5}}"#).unwrap();

        let err = DocsiftConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, DocsiftError::Config(_)));
    }
}

//! OpenAI-compatible fallback extractor.
//!
//! Works with any server implementing the `/v1/chat/completions` API with
//! JSON response format (OpenAI, vLLM, LocalAI, llama-server, ...).
//!
//! # Configuration
//!
//! Built from [`FallbackConfig`]; the API key is read from the environment
//! variable named by `api_key_env` (default `OPENAI_API_KEY`). Without a key
//! no extractor is created and the pipeline runs on patterns alone.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::FallbackError;
use crate::models::config::FallbackConfig;
use crate::models::fields::FieldMap;
use crate::text::truncate_chars;

use super::FallbackExtractor;
use super::parsing::parse_fields_response;

const SYSTEM_PROMPT: &str = "You are a helpful financial assistant. \
Extract structured data from the provided document text in JSON format.";

/// Chat-completions backed fallback extractor.
#[derive(Clone)]
pub struct OpenAiExtractor {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_input_chars: usize,
}

impl OpenAiExtractor {
    /// Create an extractor for a server and model, without an API key.
    pub fn new(base_url: &str, model: &str) -> Self {
        let defaults = FallbackConfig::default();
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            temperature: defaults.temperature,
            max_input_chars: defaults.max_input_chars,
        }
    }

    /// Set the bearer token sent with each request.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set how many document characters are sent to the model.
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Create from configuration, reading the API key from the environment.
    ///
    /// Returns `None` when the key variable is unset or empty.
    pub fn from_config(config: &FallbackConfig) -> Option<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        let Some(api_key) = api_key else {
            info!(
                "{} not set, LLM fallback extraction disabled",
                config.api_key_env
            );
            return None;
        };

        Some(
            Self::new(&config.base_url, &config.model)
                .with_api_key(&api_key)
                .with_temperature(config.temperature)
                .with_max_input_chars(config.max_input_chars),
        )
    }

    /// Prompt asking for the critical and passthrough fields.
    fn build_prompt(&self, text: &str, doc_type: &str) -> String {
        format!(
            "Extract the following fields from this {doc_type}:\n\
             - total_amount (float, e.g. 1200.50)\n\
             - date (ISO 8601 string YYYY-MM-DD or null)\n\
             - vendor (string or null)\n\
             - currency (string, e.g. USD, EUR)\n\
             \n\
             Document Text:\n\
             {}",
            truncate_chars(text, self.max_input_chars)
        )
    }

    /// Make a chat completion request and return the message content.
    async fn chat_completion(&self, prompt: &str) -> Result<String, FallbackError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
            temperature: Some(self.temperature),
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FallbackError::Api { status, body });
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| FallbackError::MalformedResponse("no message content in response".into()))
    }
}

#[async_trait]
impl FallbackExtractor for OpenAiExtractor {
    async fn extract(&self, text: &str, category_hint: &str) -> Result<FieldMap, FallbackError> {
        let prompt = self.build_prompt(text, category_hint);
        let content = self.chat_completion(&prompt).await?;
        debug!("Fallback model response: {}", content);

        parse_fields_response(&content)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

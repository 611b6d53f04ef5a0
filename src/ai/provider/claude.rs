//! Claude API Provider
//!
//! Messages endpoint (`POST /v1/messages`). The Messages API rejects
//! `top_p`, `random_seed` and the penalty parameters, so those are dropped
//! from caller overrides before the request is built.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{GenerationParams, LlmProvider, endpoint};
use crate::config::LlmConfig;
use crate::constants::claude::{API_VERSION, UNSUPPORTED_PARAMS};
use crate::types::{DigestError, ErrorCategory, ErrorClassifier, LlmError, Result};

const PROVIDER_NAME: &str = "Claude";
const MESSAGES_PATH: &str = "/v1/messages";

pub struct ClaudeProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    defaults: GenerationParams,
    client: reqwest::Client,
}

impl std::fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl ClaudeProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let settings = &config.claude;
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| DigestError::config("CLAUDE_API_KEY is not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DigestError::config(format!("Failed to create HTTP client: {}", e)))?;

        let defaults = GenerationParams::new()
            .model(&settings.model)
            .max_tokens(settings.max_tokens)
            .temperature(settings.temperature);

        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            api_base: settings.api_base.clone(),
            model: settings.model.clone(),
            defaults,
            client,
        })
    }

    pub fn default_params(&self) -> &GenerationParams {
        &self.defaults
    }

    /// Caller overrides the Messages API accepts
    pub fn supported_params(params: &GenerationParams) -> GenerationParams {
        params.without(UNSUPPORTED_PARAMS)
    }

    fn build_request(&self, prompt: &str, params: &GenerationParams) -> Value {
        let mut body = Self::supported_params(params)
            .merged_over(&self.defaults)
            .into_map();
        body.insert(
            "messages".to_string(),
            json!([{ "role": "user", "content": prompt }]),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let start_time = Instant::now();
        let request = self.build_request(prompt, params);
        let url = endpoint(&self.api_base, MESSAGES_PATH);

        debug!(model = %self.model, "Sending request to Claude API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Claude API error ({}): {}", status, body),
                PROVIDER_NAME,
            )
            .into());
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            stop_reason = parsed.stop_reason.as_deref().unwrap_or("unknown"),
            "Claude response received"
        );

        parsed
            .content
            .into_iter()
            .find_map(|block| match block.block_type.as_str() {
                "text" => block.text,
                _ => None,
            })
            .ok_or_else(|| {
                LlmError::with_provider(
                    ErrorCategory::ParseError,
                    "Claude response missing text content block",
                    PROVIDER_NAME,
                )
                .into()
            })
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// =============================================================================
// Claude API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

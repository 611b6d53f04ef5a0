//! Mistral API Provider
//!
//! Chat Completions endpoint (`POST /v1/chat/completions`) with bearer auth.
//! Supports every vendor-generic parameter.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{GenerationParams, LlmProvider, endpoint};
use crate::config::LlmConfig;
use crate::types::{DigestError, ErrorCategory, ErrorClassifier, LlmError, Result};

const PROVIDER_NAME: &str = "Mistral";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Mistral API Provider with secure API key handling
pub struct MistralProvider {
    /// Never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    defaults: GenerationParams,
    client: reqwest::Client,
}

impl std::fmt::Debug for MistralProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl MistralProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let settings = &config.mistral;
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| DigestError::config("MISTRAL_API_KEY is not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DigestError::config(format!("Failed to create HTTP client: {}", e)))?;

        let defaults = GenerationParams::new()
            .model(&settings.model)
            .temperature(settings.temperature)
            .max_tokens(settings.max_tokens)
            .top_p(settings.top_p)
            .random_seed(settings.random_seed)
            .presence_penalty(settings.presence_penalty)
            .frequency_penalty(settings.frequency_penalty);

        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            api_base: settings.api_base.clone(),
            model: settings.model.clone(),
            defaults,
            client,
        })
    }

    /// Parameters sent when the caller overrides nothing
    pub fn default_params(&self) -> &GenerationParams {
        &self.defaults
    }

    fn build_request(&self, prompt: &str, params: &GenerationParams) -> Value {
        let mut body = params.merged_over(&self.defaults).into_map();
        body.insert(
            "messages".to_string(),
            json!([{ "role": "user", "content": prompt }]),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl LlmProvider for MistralProvider {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let start_time = Instant::now();
        let request = self.build_request(prompt, params);
        let url = endpoint(&self.api_base, COMPLETIONS_PATH);

        debug!(model = %self.model, "Sending request to Mistral API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Mistral API error ({}): {}", status, body),
                PROVIDER_NAME,
            )
            .into());
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Mistral response received"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .and_then(|content| content_text(&content))
            .ok_or_else(|| {
                LlmError::with_provider(
                    ErrorCategory::ParseError,
                    "Mistral response missing choices[0].message.content",
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

/// Message content is either a plain string or a list of typed chunks.
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(chunks) => {
            let text: String = chunks
                .iter()
                .filter_map(|chunk| chunk.get("text").and_then(Value::as_str))
                .collect();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

// =============================================================================
// Mistral API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LlmConfig {
        let mut config = LlmConfig::default();
        config.mistral.api_key = Some("mistral-test-key".to_string());
        config.mistral.api_base = server.uri();
        config
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = MistralProvider::new(&LlmConfig::default()).unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
        assert_eq!(err.to_string(), "Config error: MISTRAL_API_KEY is not set");
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut config = LlmConfig::default();
        config.mistral.api_key = Some("super-secret".to_string());
        let provider = MistralProvider::new(&config).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_default_params() {
        let mut config = LlmConfig::default();
        config.mistral.api_key = Some("k".to_string());
        let provider = MistralProvider::new(&config).unwrap();
        let defaults = provider.default_params();
        assert_eq!(defaults.get("model"), Some(&json!("mistral-large-2411")));
        assert_eq!(defaults.get("max_tokens"), Some(&json!(2000)));
        assert_eq!(defaults.get("random_seed"), Some(&json!(42)));
        assert_eq!(defaults.get("top_p"), Some(&json!(0.85)));
        assert_eq!(defaults.get("presence_penalty"), Some(&json!(0.1)));
        assert_eq!(defaults.get("frequency_penalty"), Some(&json!(0.1)));
    }

    #[tokio::test]
    async fn test_generate_success_merges_overrides() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer mistral-test-key"))
            .and(body_partial_json(json!({
                "model": "mistral-large-2411",
                "max_tokens": 10,
                "temperature": 0.0,
                "random_seed": 42,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Hi there"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = MistralProvider::new(&config_for(&server)).unwrap();
        let params = GenerationParams::new().max_tokens(10).temperature(0.0);
        let text = provider.generate("hello", &params).await.unwrap();
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn test_rate_limit_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let provider = MistralProvider::new(&config_for(&server)).unwrap();
        let err = provider
            .generate("hello", &GenerationParams::new())
            .await
            .unwrap_err();

        match err {
            DigestError::Llm(llm) => {
                assert_eq!(llm.status, Some(429));
                assert!(llm.is_rate_limited());
                assert!(llm.message.contains("slow down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dropped_connection_is_network_not_rate_limit() {
        use tokio::io::AsyncReadExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
            }
        });

        let mut config = LlmConfig::default();
        config.mistral.api_key = Some("k".to_string());
        config.mistral.api_base = format!("http://127.0.0.1:{port}/proxy-429");
        let provider = MistralProvider::new(&config).unwrap();

        let err = provider
            .generate("hello", &GenerationParams::new())
            .await
            .unwrap_err();
        match err {
            DigestError::Llm(llm) => {
                assert_eq!(llm.category, ErrorCategory::Network);
                assert_eq!(llm.status, None);
                assert!(llm.message.contains("proxy-429"));
                assert!(!llm.is_rate_limited());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = MistralProvider::new(&config_for(&server)).unwrap();
        let err = provider
            .generate("hello", &GenerationParams::new())
            .await
            .unwrap_err();
        assert!(!err.is_rate_limited());
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_missing_content_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let provider = MistralProvider::new(&config_for(&server)).unwrap();
        let err = provider
            .generate("hello", &GenerationParams::new())
            .await
            .unwrap_err();
        match err {
            DigestError::Llm(llm) => assert_eq!(llm.category, ErrorCategory::ParseError),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_content_chunks_concatenated() {
        let content = json!([{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]);
        assert_eq!(content_text(&content).as_deref(), Some("ab"));
        assert_eq!(content_text(&json!(null)), None);
    }
}

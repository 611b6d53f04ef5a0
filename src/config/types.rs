//! Configuration Types
//!
//! All configuration structures with defaults matching the cron deployment.
//! API keys are never serialized and are redacted in debug output.

use serde::{Deserialize, Serialize};

use crate::constants::{claude, mistral, network, relevance};
use crate::types::{DigestError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider settings
    pub llm: LlmConfig,

    /// Relevance gate settings
    pub relevance: RelevanceConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DigestError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(DigestError::config(
                "LLM timeout_secs must be greater than 0",
            ));
        }

        validate_temperature("mistral", self.llm.mistral.temperature)?;
        validate_temperature("claude", self.llm.claude.temperature)?;

        if self.llm.mistral.max_tokens == 0 || self.llm.claude.max_tokens == 0 {
            return Err(DigestError::config("max_tokens must be greater than 0"));
        }

        validate_api_base("mistral", &self.llm.mistral.api_base)?;
        validate_api_base("claude", &self.llm.claude.api_base)?;

        if !(relevance::MIN_SCORE..=relevance::MAX_SCORE).contains(&self.relevance.threshold) {
            return Err(DigestError::config(format!(
                "Relevance threshold must be between {} and {}, got {}",
                relevance::MIN_SCORE,
                relevance::MAX_SCORE,
                self.relevance.threshold
            )));
        }

        Ok(())
    }
}

fn validate_temperature(provider: &str, temperature: f64) -> Result<()> {
    if !(0.0..=2.0).contains(&temperature) {
        return Err(DigestError::config(format!(
            "{} temperature must be between 0.0 and 2.0, got {}",
            provider, temperature
        )));
    }
    Ok(())
}

fn validate_api_base(provider: &str, api_base: &str) -> Result<()> {
    url::Url::parse(api_base).map_err(|e| {
        DigestError::config(format!(
            "Invalid {} api_base '{}': {}",
            provider, api_base, e
        ))
    })?;
    Ok(())
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Primary provider name: "mistral" or "claude" (case-insensitive)
    pub provider: String,

    /// HTTP client timeout in seconds
    pub timeout_secs: u64,

    pub mistral: MistralConfig,

    pub claude: ClaudeConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "mistral".to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            mistral: MistralConfig::default(),
            claude: ClaudeConfig::default(),
        }
    }
}

/// Mistral chat completion settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MistralConfig {
    /// Never serialized to output
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub random_seed: u64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: mistral::DEFAULT_API_BASE.to_string(),
            model: mistral::DEFAULT_MODEL.to_string(),
            temperature: mistral::DEFAULT_TEMPERATURE,
            max_tokens: mistral::DEFAULT_MAX_TOKENS,
            top_p: mistral::DEFAULT_TOP_P,
            random_seed: mistral::DEFAULT_RANDOM_SEED,
            presence_penalty: mistral::DEFAULT_PRESENCE_PENALTY,
            frequency_penalty: mistral::DEFAULT_FREQUENCY_PENALTY,
        }
    }
}

impl std::fmt::Debug for MistralConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("random_seed", &self.random_seed)
            .field("presence_penalty", &self.presence_penalty)
            .field("frequency_penalty", &self.frequency_penalty)
            .finish()
    }
}

/// Claude messages settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaudeConfig {
    /// Never serialized to output
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: claude::DEFAULT_API_BASE.to_string(),
            model: claude::DEFAULT_MODEL.to_string(),
            temperature: claude::DEFAULT_TEMPERATURE,
            max_tokens: claude::DEFAULT_MAX_TOKENS,
        }
    }
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

// =============================================================================
// Relevance Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
    /// Minimum score (1-10) for content to pass the gate
    pub threshold: u8,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            threshold: relevance::DEFAULT_THRESHOLD,
        }
    }
}

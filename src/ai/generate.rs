//! Generate Orchestrator
//!
//! Runs one prompt against the primary provider, falls back to the other
//! vendor at most once when the primary is rate limited, and scans the
//! result for leaked secrets before handing it back.
//!
//! ## Outcomes
//!
//! - `Ok(Some(text))`: generated (and validated unless skipped)
//! - `Ok(None)`: nothing to send; validation rejected the output or the
//!   vendor failed with anything but a rate limit
//! - `Err(RateLimitExhausted)`: every provider that could be tried answered 429
//! - `Err(Config)`: unknown provider name or missing primary API key

use std::sync::Arc;
use tracing::{error, info, warn};

use super::provider::{GenerateOptions, GenerationParams, ProviderFactory, SharedProvider};
use super::sanitize::validate_llm_output;
use crate::config::LlmConfig;
use crate::types::{DigestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Primary,
    Fallback,
}

/// Entry point job runners call to produce text
#[derive(Debug, Clone)]
pub struct Generator {
    factory: Arc<ProviderFactory>,
}

impl Generator {
    pub fn new(factory: Arc<ProviderFactory>) -> Self {
        Self { factory }
    }

    /// Generator over the real vendor adapters
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(Arc::new(ProviderFactory::new(config.clone())))
    }

    pub fn factory(&self) -> &ProviderFactory {
        &self.factory
    }

    /// Generate text for `prompt`.
    ///
    /// At most two provider calls are made: the primary, then the fallback
    /// only if the primary was rate limited.
    pub async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<Option<String>> {
        let GenerateOptions {
            skip_validation,
            params,
        } = options;

        let mut provider = self.factory.provider()?;
        let mut attempt = Attempt::Primary;
        let mut tried: Vec<String> = Vec::with_capacity(2);

        loop {
            tried.push(provider.name().to_string());

            match call(&provider, prompt, &params).await {
                Ok(text) => return Ok(accept(provider.name(), text, skip_validation)),
                Err(err) if err.is_rate_limited() => {
                    if attempt == Attempt::Primary
                        && let Some(fallback) = self.factory.fallback_provider()
                    {
                        warn!(
                            primary = provider.name(),
                            fallback = fallback.name(),
                            "{} rate limited, falling back to {}",
                            provider.name(),
                            fallback.name()
                        );
                        provider = fallback;
                        attempt = Attempt::Fallback;
                        continue;
                    }

                    error!(providers = %tried.join(", "), "All providers rate limited");
                    return Err(DigestError::RateLimitExhausted { providers: tried });
                }
                Err(err) => {
                    error!(
                        provider = provider.name(),
                        error = %err,
                        "{} generation failed",
                        provider.name()
                    );
                    return Ok(None);
                }
            }
        }
    }

    /// Like [`Generator::generate`], but terminates the process with exit
    /// code 1 once every provider is rate limited.
    pub async fn generate_or_exit(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<Option<String>> {
        match self.generate(prompt, options).await {
            Err(DigestError::RateLimitExhausted { .. }) => std::process::exit(1),
            other => other,
        }
    }
}

async fn call(provider: &SharedProvider, prompt: &str, params: &GenerationParams) -> Result<String> {
    info!(provider = provider.name(), model = provider.model(), "Generating");
    provider.generate(prompt, params).await
}

fn accept(provider: &str, text: String, skip_validation: bool) -> Option<String> {
    if skip_validation {
        return Some(text);
    }

    let validation = validate_llm_output(&text);
    if validation.valid {
        return Some(validation.output);
    }

    warn!(
        provider,
        warnings = ?validation.warnings,
        "Suspicious LLM output detected: {}",
        validation.warnings.join("; ")
    );
    None
}

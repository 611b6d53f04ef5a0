//! LLM Provider Abstraction
//!
//! Defines the [`LlmProvider`] trait implemented by each vendor adapter.
//! Adapters translate vendor-generic [`GenerationParams`] into their own
//! request shape and normalize every failure into an [`LlmError`].
//!
//! ## Modules
//!
//! - `factory`: Lazily constructed, memoized primary and fallback providers
//! - `params`: Ordered parameter map and per-call options

mod claude;
mod factory;
mod mistral;
mod params;

pub use claude::ClaudeProvider;
pub use factory::{ProviderConstructor, ProviderFactory};
pub use mistral::MistralProvider;
pub use params::{GenerateOptions, GenerationParams, SKIP_VALIDATION_KEYS};

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::types::{DigestError, Result};

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Text generation against a single vendor
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for `prompt`, with `params` overriding the provider defaults.
    ///
    /// Failures are returned as `DigestError::Llm` carrying the HTTP status
    /// when the vendor answered with one.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// Display name used in logs ("Mistral", "Claude")
    fn name(&self) -> &str;

    /// Default model this provider sends
    fn model(&self) -> &str;
}

/// Shared provider reference
pub type SharedProvider = Arc<dyn LlmProvider>;

// =============================================================================
// Provider Selection
// =============================================================================

/// Supported vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Mistral,
    Claude,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Mistral, ProviderKind::Claude];

    /// Configuration identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::Mistral => "mistral",
            Self::Claude => "claude",
        }
    }

    /// Name used in logs and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mistral => "Mistral",
            Self::Claude => "Claude",
        }
    }

    /// The other vendor, tried once when this one is rate limited
    pub fn fallback(&self) -> Option<ProviderKind> {
        match self {
            Self::Mistral => Some(Self::Claude),
            Self::Claude => Some(Self::Mistral),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| {
                DigestError::config(format!(
                    "Invalid AI_PROVIDER: \"{}\". Supported providers: {}",
                    s,
                    Self::ALL.map(|kind| kind.id()).join(", ")
                ))
            })
    }
}

/// Build a provider from configuration
pub fn create_provider(kind: ProviderKind, config: &LlmConfig) -> Result<SharedProvider> {
    match kind {
        ProviderKind::Mistral => Ok(Arc::new(MistralProvider::new(config)?)),
        ProviderKind::Claude => Ok(Arc::new(ClaudeProvider::new(config)?)),
    }
}

/// Trim a configured base URL so paths can be appended
pub(crate) fn endpoint(api_base: &str, path: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_kind_case_insensitive() {
        assert_eq!("mistral".parse::<ProviderKind>().unwrap(), ProviderKind::Mistral);
        assert_eq!("Claude".parse::<ProviderKind>().unwrap(), ProviderKind::Claude);
        assert_eq!(" MISTRAL ".parse::<ProviderKind>().unwrap(), ProviderKind::Mistral);
    }

    #[test]
    fn test_parse_unknown_provider_is_config_error() {
        let err = "openai".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
        assert!(err.to_string().contains("openai"));
        assert!(err.to_string().contains("mistral, claude"));
    }

    #[test]
    fn test_fallback_table() {
        assert_eq!(ProviderKind::Mistral.fallback(), Some(ProviderKind::Claude));
        assert_eq!(ProviderKind::Claude.fallback(), Some(ProviderKind::Mistral));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("https://api.mistral.ai/", "/v1/chat/completions"),
            "https://api.mistral.ai/v1/chat/completions"
        );
    }

    #[test]
    fn test_create_provider_requires_key() {
        let config = LlmConfig::default();
        let err = create_provider(ProviderKind::Claude, &config).err().unwrap();
        assert!(err.to_string().contains("CLAUDE_API_KEY"));
    }
}

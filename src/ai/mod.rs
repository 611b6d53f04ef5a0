//! AI Integration Layer
//!
//! Provider abstraction, the generate orchestrator with one-hop rate-limit
//! fallback, prompt construction and the prompt/output sanitizer.

pub mod generate;
pub mod prompt;
pub mod provider;
pub mod relevance;
pub mod sanitize;

pub use generate::Generator;
pub use prompt::{PromptBuilder, PromptSection, PromptTemplates};
pub use provider::{
    ClaudeProvider, ErrorCategory, ErrorClassifier, GenerateOptions, GenerationParams, LlmError,
    LlmProvider, MistralProvider, ProviderFactory, ProviderKind, SharedProvider, create_provider,
};
pub use relevance::{RelevanceGate, RelevanceRequest, RelevanceVerdict};
pub use sanitize::{
    OutputValidation, SanitizeOptions, sanitize_for_prompt, security_reminder,
    validate_llm_output, wrap_untrusted_content,
};

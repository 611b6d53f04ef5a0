//! crondigest - LLM Generation Core for Scheduled Digest Jobs
//!
//! The part of a cron-driven Telegram digest that talks to language models:
//! scheduled jobs hand it a prompt built from external content and get back
//! text that is safe to post.
//!
//! ## Core Features
//!
//! - **Provider Abstraction**: Mistral and Claude behind one async trait
//! - **Rate-Limit Fallback**: One hop to the other vendor on HTTP 429
//! - **Prompt-Injection Defense**: Untrusted text is filtered and delimited
//! - **Leak Detection**: Output resembling secrets is discarded
//! - **Telegram HTML Repair**: Allow-listed, balanced markup for `parse_mode: HTML`
//! - **Relevance Gate**: Cheap 1-10 scoring before a full generation
//!
//! ## Quick Start
//!
//! ```ignore
//! use crondigest::{ConfigLoader, GenerateOptions, Generator, PromptBuilder};
//! use crondigest::telegram::sanitize_telegram_html;
//!
//! let config = ConfigLoader::load()?;
//! let generator = Generator::from_config(&config.llm);
//!
//! let prompt = PromptBuilder::new()
//!     .text("Summarize this article for a security channel.")
//!     .untrusted("ARTICLE", &article_body)
//!     .build();
//!
//! if let Some(text) = generator.generate(&prompt, GenerateOptions::new()).await? {
//!     send(sanitize_telegram_html(&text));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: Providers, factory, orchestrator, prompts, sanitizer, relevance gate
//! - [`telegram`]: HTML sanitizer and message chunking
//! - [`config`]: Layered configuration
//! - [`types`]: Error types

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod telegram;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, LlmConfig, RelevanceConfig};

// Error Types
pub use types::error::{DigestError, ErrorCategory, LlmError, Result};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    // Orchestration
    GenerateOptions,
    GenerationParams,
    Generator,
    // Providers
    LlmProvider,
    ProviderFactory,
    ProviderKind,
    SharedProvider,
    // Prompts
    PromptBuilder,
    PromptTemplates,
    // Relevance
    RelevanceGate,
    RelevanceRequest,
    RelevanceVerdict,
};

// =============================================================================
// Telegram Re-exports
// =============================================================================

pub use telegram::{sanitize_telegram_html, split_for_telegram, split_message};

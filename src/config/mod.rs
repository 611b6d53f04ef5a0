//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Config file (crondigest.toml)
//! 3. Environment variables (CRONDIGEST_*)
//! 4. Deployment variables (AI_PROVIDER, MISTRAL_*, CLAUDE_*, RELEVANCE_THRESHOLD)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;

//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Prompt sanitization constants
pub mod sanitize {
    /// Default maximum length (characters) of untrusted content embedded in a prompt
    pub const DEFAULT_MAX_LENGTH: usize = 50_000;

    /// Replacement token for neutralized injection phrases
    pub const FILTERED_TOKEN: &str = "[FILTERED]";

    /// Replacement token for stripped fenced code blocks
    pub const CODE_BLOCK_TOKEN: &str = "[CODE BLOCK]";

    /// Default label for wrapped untrusted content
    pub const DEFAULT_LABEL: &str = "CONTENT";
}

/// Telegram formatting constants
pub mod telegram {
    /// Maximum message length accepted by the Bot API
    pub const MAX_MESSAGE_LENGTH: usize = 4096;

    /// Tags Telegram accepts with `parse_mode: HTML`
    pub const ALLOWED_TAGS: &[&str] = &[
        "b",
        "i",
        "u",
        "s",
        "code",
        "pre",
        "a",
        "tg-spoiler",
        "blockquote",
    ];
}

/// Relevance gate constants
pub mod relevance {
    /// Minimum score (inclusive) for content to be considered relevant
    pub const DEFAULT_THRESHOLD: u8 = 6;

    /// Maximum characters of content sent along with the title
    pub const EXCERPT_MAX_LENGTH: usize = 500;

    /// Token cap for the scoring call
    pub const MAX_TOKENS: u32 = 10;

    /// Lowest and highest valid scores
    pub const MIN_SCORE: u8 = 1;
    pub const MAX_SCORE: u8 = 10;
}

/// Mistral defaults
pub mod mistral {
    pub const DEFAULT_API_BASE: &str = "https://api.mistral.ai";
    pub const DEFAULT_MODEL: &str = "mistral-large-2411";
    pub const DEFAULT_TEMPERATURE: f64 = 0.1;
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;
    pub const DEFAULT_TOP_P: f64 = 0.85;
    pub const DEFAULT_RANDOM_SEED: u64 = 42;
    pub const DEFAULT_PRESENCE_PENALTY: f64 = 0.1;
    pub const DEFAULT_FREQUENCY_PENALTY: f64 = 0.1;
}

/// Claude defaults
pub mod claude {
    pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
    pub const DEFAULT_MODEL: &str = "claude-opus-4-20250514";
    pub const DEFAULT_TEMPERATURE: f64 = 0.1;
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;

    /// Value sent in the `anthropic-version` header
    pub const API_VERSION: &str = "2023-06-01";

    /// Vendor-generic parameters the Messages API rejects
    pub const UNSUPPORTED_PARAMS: &[&str] =
        &["top_p", "random_seed", "presence_penalty", "frequency_penalty"];
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Status code vendors use to signal throttling
    pub const RATE_LIMIT_STATUS: u16 = 429;
}

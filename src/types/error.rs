//! Unified Error Type System
//!
//! Centralized error types for the entire crate.
//! Vendor failures are normalized into a categorized [`LlmError`] at the
//! provider boundary, so the orchestrator never inspects vendor-specific
//! error shapes.
//!
//! ## Error Categories
//!
//! - **RateLimit**: HTTP 429 answered by the vendor (fallback once)
//! - **Auth**: Rejected credentials
//! - **BadRequest**: Request the vendor refused to process
//! - **Network**: Connectivity issues, timeouts
//! - **Transient**: 5xx / overloaded vendor
//! - **ParseError**: Response without the expected text field
//! - **Unknown**: Anything else

use thiserror::Error;

use crate::constants::network::RATE_LIMIT_STATUS;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used for logging and the fallback decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Vendor throttled the caller
    RateLimit,
    /// Authentication failed
    Auth,
    /// Invalid request
    BadRequest,
    /// Network/connectivity issues
    Network,
    /// Temporary server issues
    Transient,
    /// Response did not have the expected shape
    ParseError,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Network => write!(f, "NETWORK"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Only throttling triggers the fallback provider
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit)
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Normalized vendor error with category, provider and HTTP status
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for routing decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// HTTP status returned by the vendor, if any
    pub status: Option<u16>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    /// Create a new LLM error
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
            status: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
            status: None,
        }
    }

    /// Add provider context to existing error
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Attach the HTTP status the vendor answered with
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Create from simple message (defaults to Unknown category)
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unknown, message)
    }

    /// True when the vendor signalled throttling, by category or by raw status.
    pub fn is_rate_limited(&self) -> bool {
        self.category.is_rate_limit() || self.status == Some(RATE_LIMIT_STATUS)
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps heterogeneous vendor failures onto [`LlmError`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 404 | 413 | 422 => ErrorCategory::BadRequest,
            500 | 502 | 503 | 504 | 529 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider).status(status)
    }

    /// Classify a transport-level failure from the HTTP client.
    ///
    /// Only a status the vendor actually sent can mark a rate limit. The
    /// message text (which embeds the request URL) is never inspected.
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let message = err.to_string();

        if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), &message, provider);
        }

        let category = if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
        {
            ErrorCategory::Network
        } else if err.is_decode() {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Vendor or transport failure, already classified
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Missing credential, unknown provider name or invalid setting
    #[error("Config error: {0}")]
    Config(String),

    /// Every provider that could be tried answered with a rate limit
    #[error("All providers rate limited ({})", providers.join(", "))]
    RateLimitExhausted { providers: Vec<String> },
}

impl From<LlmError> for DigestError {
    fn from(err: LlmError) -> Self {
        DigestError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;

impl DigestError {
    /// Create an LLM error from message (convenience wrapper)
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(LlmError::from_message(message))
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Rate-limit classification of this error
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_rate_limited(),
            Self::RateLimitExhausted { .. } => true,
            _ => false,
        }
    }

    /// Errors that must stop the job instead of being converted to "no content"
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::RateLimitExhausted { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Relevance Gate
//!
//! Scores an item 1-10 with a short, cheap generation call before a job
//! spends a full generation on it. The gate fails open: anything short of a
//! valid score lets the item through, except fatal errors which propagate.

use tracing::{info, warn};

use super::generate::Generator;
use super::prompt::PromptTemplates;
use super::provider::{GenerateOptions, GenerationParams};
use crate::config::RelevanceConfig;
use crate::constants::relevance::{
    DEFAULT_THRESHOLD, EXCERPT_MAX_LENGTH, MAX_SCORE, MAX_TOKENS, MIN_SCORE,
};
use crate::types::Result;

/// Item to score
#[derive(Debug, Clone, Copy)]
pub struct RelevanceRequest<'a> {
    pub title: &'a str,
    /// Body text; only the first 500 characters are sent
    pub content: Option<&'a str>,
    /// Kind of item, e.g. "news article" or "podcast episode"
    pub source: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceVerdict {
    pub relevant: bool,
    /// `None` when no valid score was obtained
    pub score: Option<u8>,
}

impl RelevanceVerdict {
    fn fail_open() -> Self {
        Self {
            relevant: true,
            score: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RelevanceGate {
    threshold: u8,
}

impl Default for RelevanceGate {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl RelevanceGate {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &RelevanceConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Score `request` and compare against the threshold.
    pub async fn evaluate(
        &self,
        generator: &Generator,
        request: RelevanceRequest<'_>,
    ) -> Result<RelevanceVerdict> {
        let RelevanceRequest {
            title,
            content,
            source,
        } = request;

        let excerpt = excerpt(content.unwrap_or_default());
        let prompt = PromptTemplates::relevance(title, &excerpt, source).build();
        let options = GenerateOptions::new()
            .skip_validation()
            .with_params(GenerationParams::new().max_tokens(MAX_TOKENS).temperature(0.0));

        let raw = match generator.generate(&prompt, options).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                warn!(title, source, "Relevance check returned no result, defaulting to relevant");
                return Ok(RelevanceVerdict::fail_open());
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(title, source, error = %err, "Relevance check failed, defaulting to relevant");
                return Ok(RelevanceVerdict::fail_open());
            }
        };

        let Some(score) = parse_score(&raw) else {
            warn!(
                title,
                source,
                raw_result = raw.trim(),
                "Relevance check returned invalid score, defaulting to relevant"
            );
            return Ok(RelevanceVerdict::fail_open());
        };

        let relevant = score >= self.threshold;
        info!(
            title,
            source,
            score,
            threshold = self.threshold,
            "Relevance check: {}",
            if relevant { "relevant" } else { "skipped" }
        );

        Ok(RelevanceVerdict {
            relevant,
            score: Some(score),
        })
    }
}

fn excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_MAX_LENGTH).collect()
}

/// Leading integer of the reply ("7", " 8\n", "9/10"), if within 1..=10.
pub fn parse_score(raw: &str) -> Option<u8> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 || negative {
        return None;
    }

    let score: u32 = digits[..end].parse().ok()?;
    u8::try_from(score)
        .ok()
        .filter(|score| (MIN_SCORE..=MAX_SCORE).contains(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{LlmProvider, ProviderFactory, SharedProvider};
    use crate::config::LlmConfig;
    use crate::types::{DigestError, ErrorClassifier};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Scripted {
        reply: std::result::Result<&'static str, u16>,
        seen: Mutex<Vec<(String, GenerationParams)>>,
    }

    #[async_trait]
    impl LlmProvider for Scripted {
        async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), params.clone()));
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => {
                    Err(ErrorClassifier::classify_http_status(status, "nope", "Mistral").into())
                }
            }
        }

        fn name(&self) -> &str {
            "Mistral"
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Generator whose only provider is `Scripted`; no fallback can be built
    fn generator(reply: std::result::Result<&'static str, u16>) -> (Generator, Arc<Scripted>) {
        let provider = Arc::new(Scripted {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        let handle = provider.clone();
        let factory = ProviderFactory::with_constructor(LlmConfig::default(), move |kind, _| {
            match kind {
                crate::ai::provider::ProviderKind::Mistral => Ok(handle.clone() as SharedProvider),
                _ => Err(DigestError::config("CLAUDE_API_KEY is not set")),
            }
        });
        (Generator::new(Arc::new(factory)), provider)
    }

    fn request(content: Option<&str>) -> RelevanceRequest<'_> {
        RelevanceRequest {
            title: "Critical RCE in VPN appliance",
            content,
            source: "news article",
        }
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("7"), Some(7));
        assert_eq!(parse_score(" 10\n"), Some(10));
        assert_eq!(parse_score("8/10"), Some(8));
        assert_eq!(parse_score("1."), Some(1));
        assert_eq!(parse_score("0"), None);
        assert_eq!(parse_score("11"), None);
        assert_eq!(parse_score("-3"), None);
        assert_eq!(parse_score("seven"), None);
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("99999999999999999999"), None);
    }

    #[tokio::test]
    async fn test_score_above_threshold_is_relevant() {
        let (generator, provider) = generator(Ok("8"));
        let verdict = RelevanceGate::default()
            .evaluate(&generator, request(Some("body")))
            .await
            .unwrap();
        assert_eq!(
            verdict,
            RelevanceVerdict {
                relevant: true,
                score: Some(8)
            }
        );

        let seen = provider.seen.lock().unwrap();
        let (_, params) = &seen[0];
        assert_eq!(params.get("max_tokens"), Some(&serde_json::json!(10)));
        assert_eq!(params.get("temperature"), Some(&serde_json::json!(0.0)));
    }

    #[tokio::test]
    async fn test_score_below_threshold_is_skipped() {
        let (generator, _) = generator(Ok("3"));
        let verdict = RelevanceGate::new(6)
            .evaluate(&generator, request(None))
            .await
            .unwrap();
        assert!(!verdict.relevant);
        assert_eq!(verdict.score, Some(3));
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let (generator, _) = generator(Ok("6"));
        let verdict = RelevanceGate::new(6)
            .evaluate(&generator, request(None))
            .await
            .unwrap();
        assert!(verdict.relevant);
    }

    #[tokio::test]
    async fn test_garbage_reply_fails_open() {
        let (generator, _) = generator(Ok("very relevant!"));
        let verdict = RelevanceGate::default()
            .evaluate(&generator, request(None))
            .await
            .unwrap();
        assert_eq!(verdict, RelevanceVerdict::fail_open());
    }

    #[tokio::test]
    async fn test_vendor_error_fails_open() {
        let (generator, _) = generator(Err(500));
        let verdict = RelevanceGate::default()
            .evaluate(&generator, request(None))
            .await
            .unwrap();
        assert_eq!(verdict, RelevanceVerdict::fail_open());
    }

    #[tokio::test]
    async fn test_rate_limit_exhaustion_propagates() {
        let (generator, _) = generator(Err(429));
        let err = RelevanceGate::default()
            .evaluate(&generator, request(None))
            .await
            .unwrap_err();
        assert!(matches!(err, DigestError::RateLimitExhausted { .. }));
    }

    #[tokio::test]
    async fn test_excerpt_is_truncated() {
        let long = "a".repeat(2_000);
        let (generator, provider) = generator(Ok("5"));
        RelevanceGate::default()
            .evaluate(&generator, request(Some(long.as_str())))
            .await
            .unwrap();

        let seen = provider.seen.lock().unwrap();
        let (prompt, _) = &seen[0];
        assert!(prompt.contains(&"a".repeat(500)));
        assert!(!prompt.contains(&"a".repeat(501)));
    }
}

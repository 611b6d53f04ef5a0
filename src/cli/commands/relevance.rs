//! Relevance Command
//!
//! Usage:
//!   crondigest relevance --title T [--content C] [--source S]

use crate::ai::{Generator, RelevanceGate, RelevanceRequest, RelevanceVerdict};
use crate::cli::ui::Output;
use crate::config::Config;
use crate::types::Result;

pub async fn run(config: &Config, title: &str, content: Option<&str>, source: &str) -> Result<()> {
    let generator = Generator::from_config(&config.llm);
    let gate = RelevanceGate::from_config(&config.relevance);

    let verdict = gate
        .evaluate(
            &generator,
            RelevanceRequest {
                title,
                content,
                source,
            },
        )
        .await?;

    let output = Output::new();
    let summary = describe(&verdict, gate.threshold());
    if verdict.relevant {
        output.success(&summary);
    } else {
        output.warning(&summary);
    }
    println!("{}", if verdict.relevant { "relevant" } else { "skipped" });
    Ok(())
}

fn describe(verdict: &RelevanceVerdict, threshold: u8) -> String {
    match verdict.score {
        Some(score) => format!(
            "{} (score {}/10, threshold {})",
            if verdict.relevant { "Relevant" } else { "Skipped" },
            score,
            threshold
        ),
        None => "Relevant (no valid score, failing open)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let scored = RelevanceVerdict {
            relevant: false,
            score: Some(4),
        };
        assert_eq!(describe(&scored, 6), "Skipped (score 4/10, threshold 6)");

        let open = RelevanceVerdict {
            relevant: true,
            score: None,
        };
        assert!(describe(&open, 6).contains("failing open"));
    }
}

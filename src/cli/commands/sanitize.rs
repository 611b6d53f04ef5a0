//! Sanitize Commands
//!
//! Usage:
//!   crondigest sanitize-html [--file PATH]
//!   crondigest sanitize-prompt [--max-length N] [--remove-code-blocks] [--label L]

use std::path::Path;

use crate::ai::{SanitizeOptions, sanitize_for_prompt, security_reminder, wrap_untrusted_content};
use crate::cli::read_input;
use crate::telegram::sanitize_telegram_html;
use crate::types::Result;

pub fn html(file: Option<&Path>) -> Result<()> {
    let input = read_input(None, file)?;
    println!("{}", sanitize_telegram_html(&input));
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct PromptArgs {
    pub max_length: Option<usize>,
    pub remove_code_blocks: bool,
    /// Wrap in `<LABEL_START>`/`<LABEL_END>` and append the security notice
    pub label: Option<String>,
}

pub fn prompt(file: Option<&Path>, args: &PromptArgs) -> Result<()> {
    let input = read_input(None, file)?;
    println!("{}", render_prompt(&input, args));
    Ok(())
}

fn render_prompt(input: &str, args: &PromptArgs) -> String {
    let mut options = SanitizeOptions::default();
    if let Some(max_length) = args.max_length {
        options = options.with_max_length(max_length);
    }
    if args.remove_code_blocks {
        options = options.remove_code_blocks();
    }
    let sanitized = sanitize_for_prompt(input, &options);

    match &args.label {
        Some(label) => format!(
            "{}\n\n{}",
            wrap_untrusted_content(&sanitized, label),
            security_reminder(label)
        ),
        None => sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let args = PromptArgs {
            max_length: Some(10),
            ..PromptArgs::default()
        };
        assert_eq!(render_prompt("0123456789abcdef", &args), "0123456789");
    }

    #[test]
    fn test_render_wrapped() {
        let args = PromptArgs {
            label: Some("RSS".to_string()),
            ..PromptArgs::default()
        };
        let out = render_prompt("system: hi", &args);
        assert!(out.starts_with("<RSS_START>\n[FILTERED]hi\n<RSS_END>"));
        assert!(out.contains("SECURITY NOTICE"));
    }
}

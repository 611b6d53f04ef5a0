//! Generate Command
//!
//! Runs one prompt through the orchestrator and prints the result.
//!
//! Usage:
//!   crondigest generate [--prompt TEXT | --file PATH] [--skip-validation]
//!                       [--max-tokens N] [--temperature T] [--html] [--split]

use std::path::PathBuf;
use tracing::info;

use crate::ai::{GenerateOptions, GenerationParams, Generator};
use crate::cli::read_input;
use crate::cli::ui::Output;
use crate::config::Config;
use crate::telegram::{sanitize_telegram_html, split_for_telegram};
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub prompt: Option<String>,
    pub file: Option<PathBuf>,
    pub skip_validation: bool,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    /// Pass the output through the Telegram HTML sanitizer
    pub html: bool,
    /// Print Telegram-sized chunks
    pub split: bool,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        let mut params = GenerationParams::new();
        if let Some(max_tokens) = self.max_tokens {
            params = params.max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            params = params.temperature(temperature);
        }

        let options = GenerateOptions::new().with_params(params);
        if self.skip_validation {
            options.skip_validation()
        } else {
            options
        }
    }
}

pub async fn run(config: &Config, args: GenerateArgs) -> Result<()> {
    let prompt = read_input(args.prompt.as_deref(), args.file.as_deref())?;
    let generator = Generator::from_config(&config.llm);

    let Some(text) = generator.generate_or_exit(&prompt, args.options()).await? else {
        info!("No content generated");
        return Ok(());
    };

    let text = if args.html {
        sanitize_telegram_html(&text)
    } else {
        text
    };

    if args.split {
        let output = Output::new();
        let chunks = split_for_telegram(&text);
        for (i, chunk) in chunks.iter().enumerate() {
            output.chunk_header(i + 1, chunks.len());
            println!("{}", chunk);
        }
    } else {
        println!("{}", text);
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crondigest::cli::commands::generate::GenerateArgs;
use crondigest::cli::commands::sanitize::PromptArgs;
use crondigest::cli::ui::Output;
use crondigest::config::{Config, ConfigLoader};

#[derive(Parser)]
#[command(name = "crondigest")]
#[command(
    version,
    about = "Drive the digest generation core: providers, sanitizers, relevance gate"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./crondigest.toml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate text with the configured provider (fallback on rate limit)
    Generate {
        #[arg(long, short, help = "Prompt text (default: read stdin)")]
        prompt: Option<String>,
        #[arg(long, short, help = "Read the prompt from a file")]
        file: Option<PathBuf>,
        #[arg(long, help = "Skip the leaked-secret scan on the output")]
        skip_validation: bool,
        #[arg(long, help = "Override max_tokens")]
        max_tokens: Option<u32>,
        #[arg(long, help = "Override temperature")]
        temperature: Option<f64>,
        #[arg(long, help = "Sanitize the output as Telegram HTML")]
        html: bool,
        #[arg(long, help = "Print Telegram-sized chunks")]
        split: bool,
    },

    /// Repair LLM output into Telegram-safe HTML
    SanitizeHtml {
        #[arg(long, short, help = "Input file (default: stdin)")]
        file: Option<PathBuf>,
    },

    /// Neutralize prompt-injection phrasing in untrusted text
    SanitizePrompt {
        #[arg(long, short, help = "Input file (default: stdin)")]
        file: Option<PathBuf>,
        #[arg(long, help = "Maximum characters kept")]
        max_length: Option<usize>,
        #[arg(long, help = "Replace fenced code blocks")]
        remove_code_blocks: bool,
        #[arg(long, help = "Wrap in <LABEL_START>/<LABEL_END> with a security notice")]
        label: Option<String>,
    },

    /// Score an item 1-10 against the relevance threshold
    Relevance {
        #[arg(long, short)]
        title: String,
        #[arg(long, help = "Body text; the first 500 characters are scored")]
        content: Option<String>,
        #[arg(long, short, default_value = "news article")]
        source: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources, keys hidden)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let load_config = || -> anyhow::Result<Config> {
        Ok(ConfigLoader::load_from(cli.config.as_deref())?)
    };

    match cli.command {
        Commands::Generate {
            prompt,
            file,
            skip_validation,
            max_tokens,
            temperature,
            html,
            split,
        } => {
            let config = load_config()?;
            let rt = Runtime::new()?;
            rt.block_on(crondigest::cli::commands::generate::run(
                &config,
                GenerateArgs {
                    prompt,
                    file,
                    skip_validation,
                    max_tokens,
                    temperature,
                    html,
                    split,
                },
            ))?;
        }
        Commands::SanitizeHtml { file } => {
            crondigest::cli::commands::sanitize::html(file.as_deref())?;
        }
        Commands::SanitizePrompt {
            file,
            max_length,
            remove_code_blocks,
            label,
        } => {
            crondigest::cli::commands::sanitize::prompt(
                file.as_deref(),
                &PromptArgs {
                    max_length,
                    remove_code_blocks,
                    label,
                },
            )?;
        }
        Commands::Relevance {
            title,
            content,
            source,
        } => {
            let config = load_config()?;
            let rt = Runtime::new()?;
            rt.block_on(crondigest::cli::commands::relevance::run(
                &config,
                &title,
                content.as_deref(),
                &source,
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let config = load_config()?;
                crondigest::cli::commands::config::show(&config, &format)?;
            }
        },
    }

    Ok(())
}

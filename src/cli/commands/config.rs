//! Config Command
//!
//! Usage:
//!   crondigest config show [-f json]

use crate::config::{Config, ConfigLoader};
use crate::types::{DigestError, Result};

/// Print the effective configuration. API keys are never rendered.
pub fn show(config: &Config, format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" | "text" => false,
        other => {
            return Err(DigestError::config(format!(
                "Invalid format '{}'. Valid values: toml, json",
                other
            )));
        }
    };

    println!("{}", ConfigLoader::render(config, as_json)?);
    Ok(())
}

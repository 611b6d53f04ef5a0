//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (`crondigest.toml` or an explicit path)
//! 3. Environment variables with the `CRONDIGEST_` prefix (`__` nests)
//! 4. Flat deployment variables (`AI_PROVIDER`, `MISTRAL_*`, `CLAUDE_*`,
//!    `RELEVANCE_THRESHOLD`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{DigestError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → config file → prefixed env → flat env
    pub fn load() -> Result<Config> {
        Self::load_from(None)
    }

    /// Same as [`ConfigLoader::load`], reading `path` instead of the default file
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);
        if file.exists() {
            debug!("Loading config from: {}", file.display());
            figment = figment.merge(Toml::file(&file));
        } else if path.is_some() {
            return Err(DigestError::config(format!(
                "Config file not found: {}",
                file.display()
            )));
        }

        figment = figment
            .merge(Env::prefixed("CRONDIGEST_").split("__"))
            .merge(Self::deployment_env());

        let config: Config = figment
            .extract()
            .map_err(|e| DigestError::config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Default config file, relative to the working directory
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("crondigest.toml")
    }

    /// Flat variables used by the cron deployment, mapped onto config paths.
    fn deployment_env() -> Figment {
        Figment::new()
            .merge(Env::raw().only(&["AI_PROVIDER"]).map(|_| "llm.provider".into()))
            .merge(
                Env::raw()
                    .only(&["RELEVANCE_THRESHOLD"])
                    .map(|_| "relevance.threshold".into()),
            )
            .merge(
                Env::prefixed("MISTRAL_")
                    .map(|key| format!("llm.mistral.{}", key.as_str().to_ascii_lowercase()).into()),
            )
            .merge(
                Env::prefixed("CLAUDE_")
                    .map(|key| format!("llm.claude.{}", key.as_str().to_ascii_lowercase()).into()),
            )
    }

    /// Render the effective configuration; API keys are never serialized.
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| DigestError::config(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_default_config() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.llm.timeout_secs, 300);
            assert_eq!(config.llm.claude.model, "claude-opus-4-20250514");
            Ok(())
        });
    }

    #[test]
    fn test_flat_env_override() {
        Jail::expect_with(|jail| {
            jail.set_env("AI_PROVIDER", "Claude");
            jail.set_env("CLAUDE_API_KEY", "sk-ant-test");
            jail.set_env("MISTRAL_MODEL", "mistral-small");
            jail.set_env("MISTRAL_TEMPERATURE", "0.4");
            jail.set_env("RELEVANCE_THRESHOLD", "8");

            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.llm.provider, "Claude");
            assert_eq!(config.llm.claude.api_key.as_deref(), Some("sk-ant-test"));
            assert_eq!(config.llm.mistral.model, "mistral-small");
            assert!((config.llm.mistral.temperature - 0.4).abs() < f64::EPSILON);
            assert_eq!(config.relevance.threshold, 8);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "crondigest.toml",
                r#"
                [llm]
                provider = "claude"
                timeout_secs = 60

                [llm.claude]
                model = "claude-from-file"
                "#,
            )?;
            jail.set_env("CRONDIGEST_LLM__TIMEOUT_SECS", "30");
            jail.set_env("CLAUDE_MODEL", "claude-from-env");

            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.llm.provider, "claude");
            assert_eq!(config.llm.timeout_secs, 30);
            assert_eq!(config.llm.claude.model, "claude-from-env");
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        Jail::expect_with(|_jail| {
            let result = ConfigLoader::load_from(Some(Path::new("nope.toml")));
            assert!(matches!(result, Err(DigestError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("RELEVANCE_THRESHOLD", "42");
            assert!(ConfigLoader::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[relevance]\nthreshold = 3\n")?;

            let config = ConfigLoader::load_from(Some(Path::new("custom.toml"))).unwrap();
            assert_eq!(config.relevance.threshold, 3);
            Ok(())
        });
    }

    #[test]
    fn test_render_hides_keys() {
        let mut config = Config::default();
        config.llm.mistral.api_key = Some("sk-hidden".to_string());

        let toml_out = ConfigLoader::render(&config, false).unwrap();
        assert!(toml_out.contains("mistral-large-2411"));
        assert!(!toml_out.contains("sk-hidden"));

        let json_out = ConfigLoader::render(&config, true).unwrap();
        assert!(!json_out.contains("sk-hidden"));
    }
}

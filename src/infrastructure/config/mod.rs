use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Store base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid timeout: {0}. Must be at least 1 second")]
    InvalidTimeout(u64),

    #[error("Invalid max_concurrency: {0}. Must be between 1 and 64")]
    InvalidMaxConcurrency(usize),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `.docket/config.yaml` (project config)
    /// 3. `.docket/local.yaml` (local overrides, optional)
    /// 4. Environment variables (`DOCKET_*` prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".docket/config.yaml"))
            .merge(Yaml::file(".docket/local.yaml"))
            .merge(Env::prefixed("DOCKET_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.store.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if config.store.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.store.timeout_secs));
        }

        if config.trigger.max_concurrency == 0 || config.trigger.max_concurrency > 64 {
            return Err(ConfigError::InvalidMaxConcurrency(config.trigger.max_concurrency));
        }

        let retry = &config.store.retry;
        if retry.initial_backoff_ms >= retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                retry.initial_backoff_ms,
                retry.max_backoff_ms,
            ));
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        }

        match config.logging.format.as_str() {
            "json" | "pretty" => {}
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut config = Config::default();
        config.store.base_url = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyBaseUrl)
        ));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut config = Config::default();
        config.trigger.max_concurrency = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConcurrency(0))
        ));
    }

    #[test]
    fn inverted_backoff_is_rejected() {
        let mut config = Config::default();
        config.store.retry.initial_backoff_ms = 60_000;
        config.store.retry.max_backoff_ms = 1_000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(60_000, 1_000))
        ));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}

//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: 0")]
    InvalidPort,

    #[error("Server host cannot be empty")]
    EmptyHost,

    #[error("Base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Chat model cannot be empty")]
    EmptyChatModel,

    #[error("Embedding model cannot be empty")]
    EmptyEmbeddingModel,

    #[error("Invalid embedding dimension: 0")]
    InvalidEmbeddingDimension,

    #[error("Invalid max_batch_size: 0")]
    InvalidMaxBatchSize,

    #[error("Invalid timeout: 0")]
    InvalidTimeout,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. storyweaver.yaml in the working directory
    /// 3. Environment variables (STORYWEAVER_* prefix, `__` separator)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("storyweaver.yaml"))
            .merge(Env::prefixed("STORYWEAVER_").split("__"))
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
            .merge(Env::prefixed("STORYWEAVER_").split("__"))
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
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if config.server.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if config.openai.base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if config.openai.chat_model.is_empty() {
            return Err(ConfigError::EmptyChatModel);
        }

        if config.openai.embedding_model.is_empty() {
            return Err(ConfigError::EmptyEmbeddingModel);
        }

        if config.openai.embedding_dimension == 0 {
            return Err(ConfigError::InvalidEmbeddingDimension);
        }

        if config.openai.max_batch_size == 0 {
            return Err(ConfigError::InvalidMaxBatchSize);
        }

        if config.openai.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPort)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_models() {
        let mut config = Config::default();
        config.openai.chat_model = String::new();
        assert!(ConfigLoader::validate(&config).is_err());

        let mut config = Config::default();
        config.openai.embedding_model = String::new();
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_load_from_file_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 8080\nopenai:\n  chat_model: local-model"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.openai.chat_model, "local-model");
        // Untouched values keep their defaults.
        assert_eq!(config.openai.embedding_dimension, 1536);
    }
}

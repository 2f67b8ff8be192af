//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and logger setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("application label must be set before logging")]
    MissingApplication,

    #[error("application label is already set to `{0}`")]
    ApplicationAlreadySet(String),

    #[error("invalid collector URL `{0}`")]
    InvalidCollectorUrl(String),

    #[error("{var} has invalid value `{value}`")]
    InvalidEnv { var: &'static str, value: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variable holding the application label.
pub const ENV_APPLICATION: &str = "LOG_APPLICATION";
/// Environment variable holding the collector URL.
pub const ENV_COLLECTOR_URL: &str = "LOG_SERVICE_URL";
/// `LOG_LEVEL=DEBUG` turns on the debug flag.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_QUEUE_CAPACITY: &str = "LOG_QUEUE_CAPACITY";

/// Load a TOML file, overlay the process environment, then validate.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load a TOML file and overlay the process environment without validating,
/// for callers that apply further overrides first.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parse TOML content, overlay variables from `env`, then validate.
pub fn parse_config<F>(content: &str, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: Config = toml::from_str(content)?;
    apply_env(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay environment variables on top of file values.
pub fn apply_env<F>(config: &mut Config, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(application) = env(ENV_APPLICATION) {
        config.logger.application = application;
    }
    if let Some(url) = env(ENV_COLLECTOR_URL) {
        config.logger.collector_url = Some(url);
    }
    if let Some(level) = env(ENV_LOG_LEVEL) {
        config.logger.debug = level.eq_ignore_ascii_case("debug");
    }
    if let Some(capacity) = env(ENV_QUEUE_CAPACITY) {
        config.logger.queue_capacity =
            capacity.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_QUEUE_CAPACITY,
                value: capacity.clone(),
            })?;
    }
    Ok(())
}

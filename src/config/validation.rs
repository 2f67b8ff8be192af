//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacity > 0, addresses parse)
//! - Check the collector URL is an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{Config, LoggerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logger.application must not be empty")]
    EmptyApplication,

    #[error("logger.collector_url `{0}` is not a valid http(s) URL")]
    CollectorUrl(String),

    #[error("logger.queue_capacity must be greater than zero")]
    ZeroCapacity,

    #[error("{field} `{value}` is not a valid socket address")]
    Address { field: &'static str, value: String },
}

/// Validate a full configuration.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = logger_errors(&config.logger);

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::Address {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the log shipping section.
pub fn validate_logger(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let errors = logger_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn logger_errors(config: &LoggerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.application.trim().is_empty() {
        errors.push(ValidationError::EmptyApplication);
    }
    if config.queue_capacity == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }
    if let Some(raw) = config.collector_url.as_deref().filter(|u| !u.is_empty()) {
        if parse_collector_url(raw).is_none() {
            errors.push(ValidationError::CollectorUrl(raw.to_string()));
        }
    }

    errors
}

/// Parse a collector URL, accepting only http and https.
pub fn parse_collector_url(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

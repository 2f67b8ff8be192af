//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so a minimal file only needs the application
//! label.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Log shipping settings.
    pub logger: LoggerConfig,

    /// Demo server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Log shipping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Label identifying the emitting service. Required.
    pub application: String,

    /// Collector endpoint. `None` or empty means console only.
    pub collector_url: Option<String>,

    /// Slots per severity queue.
    pub queue_capacity: usize,

    /// When entries are echoed to stdout.
    pub console: ConsoleMode,

    /// Debug flag consulted by [`ConsoleMode::DebugOnly`].
    pub debug: bool,

    /// Deadline for a single collector request. 0 disables the deadline.
    pub request_timeout_secs: u64,
}

impl LoggerConfig {
    /// Shorthand for a config with the given label and all other defaults.
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Whether an entry should be echoed to stdout.
    pub fn console_enabled(&self) -> bool {
        match self.console {
            ConsoleMode::Always => true,
            ConsoleMode::DebugOnly => self.debug,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            application: String::new(),
            collector_url: None,
            queue_capacity: 100,
            console: ConsoleMode::Always,
            debug: false,
            request_timeout_secs: 10,
        }
    }
}

/// Console echo policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleMode {
    #[default]
    Always,
    DebugOnly,
}

/// Demo server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "log_relay=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

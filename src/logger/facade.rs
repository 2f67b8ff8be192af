//! Process-wide logging surface.
//!
//! Call [`set_application`] (or [`init`]) once at startup, before any
//! concurrent use. The collector URL may be changed at any time.
//!
//! Delivery failures are reported through `tracing` once a subscriber is
//! installed (see [`crate::observability::logging::init_tracing`]); without
//! one they are written as `WARN` lines to the console writer.
//!
//! ```no_run
//! use log_relay::logger::facade;
//!
//! facade::set_application("orders")?;
//! facade::set_collector_url("http://logs.internal:8000/logs")?;
//! facade::log_info("service started")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use once_cell::sync::{Lazy, OnceCell};
use serde_json::Value;
use url::Url;

use super::{store_collector_url, LogError, Logger, LoggerBuilder};
use crate::codec::Severity;
use crate::config::validation::validate_logger;
use crate::config::{ConfigError, LoggerConfig};

struct Facade {
    application: OnceCell<String>,
    collector: Arc<ArcSwapOption<Url>>,
    logger: OnceCell<Logger>,
}

static FACADE: Lazy<Facade> = Lazy::new(|| Facade {
    application: OnceCell::new(),
    collector: Arc::new(ArcSwapOption::empty()),
    logger: OnceCell::new(),
});

/// Set the application label. Must be called exactly once.
pub fn set_application(name: impl Into<String>) -> Result<(), ConfigError> {
    let name = name.into();
    if name.trim().is_empty() {
        return Err(ConfigError::MissingApplication);
    }
    FACADE
        .application
        .set(name)
        .map_err(|_| ConfigError::ApplicationAlreadySet(application().unwrap_or_default()))
}

/// The label set by [`set_application`], if any.
pub fn application() -> Option<String> {
    FACADE.application.get().cloned()
}

/// Set or overwrite the collector URL. Empty means console only.
pub fn set_collector_url(url: &str) -> Result<(), ConfigError> {
    store_collector_url(&FACADE.collector, url)
}

/// Configure the global logger in one step.
///
/// Sets the application label and collector URL and starts the relay with
/// the configured capacity and console mode. The whole config is checked
/// first, so a rejected config leaves the facade untouched.
pub fn init(config: LoggerConfig) -> Result<Logger, LogError> {
    if config.application.trim().is_empty() {
        return Err(ConfigError::MissingApplication.into());
    }
    validate_logger(&config).map_err(ConfigError::Validation)?;
    if let Some(existing) = application() {
        return Err(ConfigError::ApplicationAlreadySet(existing).into());
    }

    set_application(config.application.clone())?;
    if let Some(url) = config.collector_url.as_deref() {
        set_collector_url(url)?;
    }
    install(config)
}

/// The global logger, started on first use after the label is set.
pub fn global() -> Result<Logger, LogError> {
    if let Some(logger) = FACADE.logger.get() {
        return Ok(logger.clone());
    }
    let application = FACADE.application.get().ok_or(LogError::ApplicationNotSet)?;
    install(LoggerConfig::new(application.clone()))
}

fn install(mut config: LoggerConfig) -> Result<Logger, LogError> {
    // The shared slot already holds the validated URL.
    config.collector_url = None;
    FACADE
        .logger
        .get_or_try_init(|| {
            LoggerBuilder::new(config)
                .shared_collector(FACADE.collector.clone())
                .build()
        })
        .cloned()
}

pub fn log_info(content: impl Into<Value>) -> Result<(), LogError> {
    global()?.log(Severity::Info, content)
}

pub fn log_warning(content: impl Into<Value>) -> Result<(), LogError> {
    global()?.log(Severity::Warning, content)
}

pub fn log_error(content: impl Into<Value>) -> Result<(), LogError> {
    global()?.log(Severity::Error, content)
}

/// Flush the global logger, if it has been started.
pub fn flush(timeout: Duration) -> bool {
    FACADE
        .logger
        .get()
        .map(|logger| logger.flush(timeout))
        .unwrap_or(true)
}

/// Drain and stop the global relay. Call once at process exit.
pub fn shutdown() {
    if let Some(logger) = FACADE.logger.get() {
        logger.shutdown();
    }
}

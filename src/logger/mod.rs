//! Logging facade.
//!
//! # Responsibilities
//! - Provide the severity-tagged entry points (`info`, `warning`, `error`)
//! - Own the application label and the swappable collector URL
//! - Hand entries to the relay without touching the network
//!
//! # Design Decisions
//! - [`Logger`] is an explicit context object; clones share one relay
//! - The process-wide surface in [`facade`] is a thin layer over a global
//!   `Logger` with a write-once application label
//! - Logging before the label is set fails the call instead of aborting

pub mod facade;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::codec::{LogMessage, Severity};
use crate::config::validation::{parse_collector_url, validate_logger};
use crate::config::{ConfigError, LoggerConfig};
use crate::relay::{LogSink, Relay, RelayError, ShippingSink};

/// Errors returned by log calls and logger construction.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("application label not set; call set_application before logging")]
    ApplicationNotSet,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Handle for emitting log entries.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    application: String,
    collector: Arc<ArcSwapOption<Url>>,
    relay: Relay,
}

impl Logger {
    /// Start building a logger for `application`.
    pub fn builder(application: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(LoggerConfig::new(application))
    }

    /// Build a logger with the default sink from a config section.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, LogError> {
        LoggerBuilder::new(config.clone()).build()
    }

    pub fn info(&self, content: impl Into<Value>) -> Result<(), LogError> {
        self.log(Severity::Info, content)
    }

    pub fn warning(&self, content: impl Into<Value>) -> Result<(), LogError> {
        self.log(Severity::Warning, content)
    }

    pub fn error(&self, content: impl Into<Value>) -> Result<(), LogError> {
        self.log(Severity::Error, content)
    }

    /// Queue an entry, blocking while the severity queue is full.
    pub fn log(&self, severity: Severity, content: impl Into<Value>) -> Result<(), LogError> {
        let message = LogMessage::new(severity, self.inner.application.as_str(), content.into());
        self.inner.relay.enqueue(message)?;
        Ok(())
    }

    /// Queue an entry without blocking; a full queue rejects it.
    pub fn try_log(&self, severity: Severity, content: impl Into<Value>) -> Result<(), LogError> {
        let message = LogMessage::new(severity, self.inner.application.as_str(), content.into());
        self.inner.relay.try_enqueue(message)?;
        Ok(())
    }

    /// Replace the collector URL. An empty string disables network delivery.
    ///
    /// An invalid URL also disables network delivery and is reported.
    pub fn set_collector_url(&self, url: &str) -> Result<(), ConfigError> {
        store_collector_url(&self.inner.collector, url)
    }

    pub fn collector_url(&self) -> Option<Url> {
        self.inner.collector.load_full().map(|url| (*url).clone())
    }

    pub fn application(&self) -> &str {
        &self.inner.application
    }

    /// Wait for queued entries to be delivered. See [`Relay::flush`].
    pub fn flush(&self, timeout: Duration) -> bool {
        self.inner.relay.flush(timeout)
    }

    /// Drain and stop the relay. Later log calls fail with `Closed`.
    pub fn shutdown(&self) {
        self.inner.relay.shutdown();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("application", &self.inner.application)
            .field("collector", &self.collector_url())
            .field("relay", &self.inner.relay)
            .finish()
    }
}

pub(crate) fn store_collector_url(
    slot: &ArcSwapOption<Url>,
    url: &str,
) -> Result<(), ConfigError> {
    if url.is_empty() {
        slot.store(None);
        return Ok(());
    }
    match parse_collector_url(url) {
        Some(parsed) => {
            slot.store(Some(Arc::new(parsed)));
            Ok(())
        }
        None => {
            slot.store(None);
            Err(ConfigError::InvalidCollectorUrl(url.to_string()))
        }
    }
}

/// Builder for [`Logger`].
pub struct LoggerBuilder {
    config: LoggerConfig,
    console: Option<Option<Box<dyn Write + Send>>>,
    sink: Option<Box<dyn LogSink>>,
    collector: Option<Arc<ArcSwapOption<Url>>>,
}

impl LoggerBuilder {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            console: None,
            sink: None,
            collector: None,
        }
    }

    pub fn collector_url(mut self, url: impl Into<String>) -> Self {
        self.config.collector_url = Some(url.into());
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Redirect the console echo. Ignored when a custom sink is set, and
    /// still subject to the configured console mode.
    pub fn console_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.console = Some(Some(Box::new(writer)));
        self
    }

    /// Deliver to `sink` instead of console + collector.
    pub fn sink(mut self, sink: impl LogSink) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Share an existing collector slot, e.g. the global facade's.
    pub(crate) fn shared_collector(mut self, collector: Arc<ArcSwapOption<Url>>) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn build(self) -> Result<Logger, LogError> {
        if self.config.application.trim().is_empty() {
            return Err(ConfigError::MissingApplication.into());
        }
        validate_logger(&self.config).map_err(ConfigError::Validation)?;

        let collector = match self.collector {
            Some(shared) => shared,
            None => {
                let slot = Arc::new(ArcSwapOption::empty());
                if let Some(url) = self.config.collector_url.as_deref() {
                    store_collector_url(&slot, url)?;
                }
                slot
            }
        };

        let relay = match self.sink {
            Some(sink) => Relay::spawn(self.config.queue_capacity, BoxedSink(sink))?,
            None => {
                let console: Option<Box<dyn Write + Send>> = match self.console {
                    _ if !self.config.console_enabled() => None,
                    Some(writer) => writer,
                    None => Some(Box::new(std::io::stdout())),
                };
                let sink = ShippingSink::new(collector.clone())
                    .with_console(console)
                    .with_timeout(self.config.request_timeout());
                Relay::spawn(self.config.queue_capacity, sink)?
            }
        };

        tracing::debug!(
            application = %self.config.application,
            capacity = self.config.queue_capacity,
            collector = ?collector.load_full(),
            "logger started"
        );

        Ok(Logger {
            inner: Arc::new(Inner {
                application: self.config.application,
                collector,
                relay,
            }),
        })
    }
}

struct BoxedSink(Box<dyn LogSink>);

impl LogSink for BoxedSink {
    fn deliver(&self, message: LogMessage) {
        self.0.deliver(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleMode;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Clone, Default)]
    struct Collect(Arc<Mutex<Vec<LogMessage>>>);

    impl LogSink for Collect {
        fn deliver(&self, message: LogMessage) {
            self.0.lock().push(message);
        }
    }

    #[test]
    fn test_empty_application_is_rejected() {
        let err = Logger::builder("").build().unwrap_err();
        assert!(matches!(err, LogError::Config(ConfigError::MissingApplication)));

        let err = Logger::from_config(&LoggerConfig::default()).unwrap_err();
        assert!(matches!(err, LogError::Config(ConfigError::MissingApplication)));
    }

    #[test]
    fn test_entries_carry_application_and_severity() {
        let sink = Collect::default();
        let logger = Logger::builder("inventory").sink(sink.clone()).build().unwrap();

        logger.info("started").unwrap();
        logger.warning(json!({"disk": 91})).unwrap();
        logger.error("gone").unwrap();
        assert!(logger.flush(Duration::from_secs(5)));

        let delivered = sink.0.lock();
        assert_eq!(delivered.len(), 3);
        assert!(delivered.iter().all(|m| m.application == "inventory"));
        let warning = delivered.iter().find(|m| m.severity == Severity::Warning).unwrap();
        assert_eq!(warning.content, json!({"disk": 91}));
    }

    #[test]
    fn test_collector_url_swaps() {
        let logger = Logger::builder("svc").sink(Collect::default()).build().unwrap();
        assert!(logger.collector_url().is_none());

        logger.set_collector_url("http://127.0.0.1:9000/logs").unwrap();
        assert_eq!(logger.collector_url().unwrap().port(), Some(9000));

        logger.set_collector_url("").unwrap();
        assert!(logger.collector_url().is_none());

        let err = logger.set_collector_url("::nope::").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCollectorUrl(_)));
        assert!(logger.collector_url().is_none());
    }

    #[test]
    fn test_invalid_config_collector_is_rejected() {
        let err = Logger::builder("svc")
            .collector_url("nope")
            .sink(Collect::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, LogError::Config(ConfigError::Validation(_))));
    }

    #[derive(Clone, Default)]
    struct Buf(Arc<Mutex<Vec<u8>>>);

    impl Write for Buf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_debug_only_console_applies_to_custom_writer() {
        for (debug, expected_lines) in [(false, 0), (true, 1)] {
            let mut config = LoggerConfig::new("svc");
            config.console = ConsoleMode::DebugOnly;
            config.debug = debug;
            let buf = Buf::default();
            let logger = LoggerBuilder::new(config)
                .console_writer(buf.clone())
                .build()
                .unwrap();

            logger.info("echo?").unwrap();
            assert!(logger.flush(Duration::from_secs(5)));
            let out = String::from_utf8(buf.0.lock().clone()).unwrap();
            assert_eq!(out.lines().count(), expected_lines, "debug = {debug}");
        }
    }

    #[test]
    fn test_log_after_shutdown_fails() {
        let logger = Logger::builder("svc").sink(Collect::default()).build().unwrap();
        let clone = logger.clone();
        logger.shutdown();

        let err = clone.info("late").unwrap_err();
        assert!(matches!(err, LogError::Relay(RelayError::Closed)));
    }
}

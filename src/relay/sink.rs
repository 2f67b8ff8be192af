//! Delivery targets for relayed entries.
//!
//! # Responsibilities
//! - Echo each entry as one JSON line on the console
//! - POST the same JSON to the collector when one is configured
//! - Report failures locally; never hand them back to the producer
//!
//! # Design Decisions
//! - The console echo and the collector POST are independent: a failed
//!   console write is reported and the POST still happens
//! - Failures go through `tracing` when a subscriber is installed, otherwise
//!   a warning line is written to the console writer (stdout by default)
//! - The HTTP client is built lazily on the worker thread, so it is created
//!   and dropped outside any async runtime
//! - Collector URL is read per delivery, so it can be swapped at runtime
//! - Only 2xx counts as delivered; no retries

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

use crate::codec::LogMessage;
use crate::observability::metrics;

/// Receives every entry the relay worker dequeues.
pub trait LogSink: Send + Sync + 'static {
    fn deliver(&self, message: LogMessage);
}

/// Outcome of a successful delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Written to the console (if enabled) and accepted by the collector.
    Shipped,
    /// No collector configured.
    ConsoleOnly,
}

/// Why an entry did not reach the collector.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to serialize log entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write log entry to console: {0}")]
    Console(#[from] io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("error sending request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("received non 2xx status code: {0}")]
    Status(u16),
}

impl DeliveryError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            DeliveryError::Serialize(_) => "serialize",
            DeliveryError::Console(_) => "console",
            DeliveryError::Client(_) => "client",
            DeliveryError::Transport(_) => "transport",
            DeliveryError::Status(_) => "status",
        }
    }
}

type ConsoleWriter = Box<dyn Write + Send>;

/// Default sink: console echo plus collector POST.
pub struct ShippingSink {
    console: Option<Mutex<ConsoleWriter>>,
    collector: Arc<ArcSwapOption<Url>>,
    timeout: Option<Duration>,
    client: OnceCell<Client>,
}

impl ShippingSink {
    /// Sink echoing to stdout and posting to whatever `collector` holds.
    pub fn new(collector: Arc<ArcSwapOption<Url>>) -> Self {
        Self {
            console: Some(Mutex::new(Box::new(io::stdout()))),
            collector,
            timeout: None,
            client: OnceCell::new(),
        }
    }

    /// Replace the console writer. `None` disables the echo.
    pub fn with_console(mut self, writer: Option<ConsoleWriter>) -> Self {
        self.console = writer.map(Mutex::new);
        self
    }

    /// Deadline for each collector request.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Write `message` to the console and the collector.
    ///
    /// A console failure is reported on its own and does not stop the POST;
    /// the result describes the collector side only.
    pub fn ship(&self, message: &LogMessage) -> Result<Delivery, DeliveryError> {
        let payload = message.to_json()?;

        if let Err(err) = self.echo(&payload) {
            self.fail(message, &DeliveryError::Console(err));
        }

        let Some(url) = self.collector.load_full() else {
            return Ok(Delivery::ConsoleOnly);
        };

        let response = self
            .client()?
            .post(url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .map_err(DeliveryError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }
        Ok(Delivery::Shipped)
    }

    fn echo(&self, payload: &str) -> io::Result<()> {
        let Some(console) = &self.console else {
            return Ok(());
        };
        let mut out = console.lock();
        writeln!(out, "{payload}")?;
        out.flush()
    }

    fn fail(&self, message: &LogMessage, err: &DeliveryError) {
        metrics::record_delivery_failure(err.reason());
        if tracing::dispatcher::has_been_set() {
            tracing::warn!(
                id = %message.id,
                severity = %message.severity,
                error = %err,
                "log delivery failed"
            );
            return;
        }
        let line = format!(
            "WARN log delivery failed: {err} (id={}, severity={})",
            message.id, message.severity
        );
        // Nowhere left to report a failed report.
        let _ = match &self.console {
            Some(console) => writeln!(console.lock(), "{line}"),
            None => writeln!(io::stdout(), "{line}"),
        };
    }

    fn client(&self) -> Result<&Client, DeliveryError> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(DeliveryError::Client)
        })
    }
}

impl LogSink for ShippingSink {
    fn deliver(&self, message: LogMessage) {
        match self.ship(&message) {
            Ok(_) => metrics::record_delivered(),
            Err(err) => self.fail(&message, &err),
        }
    }
}

impl std::fmt::Debug for ShippingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingSink")
            .field("console", &self.console.is_some())
            .field("collector", &self.collector.load_full())
            .field("timeout", &self.timeout)
            .finish()
    }
}

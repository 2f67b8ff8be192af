//! In-process log shipping client.
//!
//! Entries are queued per severity, drained by a background worker, echoed
//! to stdout and POSTed to a collector. HTTP-facing errors render their cause
//! chain as JSON and log themselves.

pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod relay;

pub use codec::{LogMessage, Severity};
pub use config::{Config, LoggerConfig};
pub use error::{Error, HttpError};
pub use logger::{facade, LogError, Logger};
pub use relay::Relay;

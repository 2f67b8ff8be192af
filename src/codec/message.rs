//! Log message definitions.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Severity of a log entry.
///
/// Serialized as its single-letter code; the full name is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "i", alias = "info")]
    Info,
    #[serde(rename = "w", alias = "warning")]
    Warning,
    #[serde(rename = "e", alias = "error")]
    Error,
}

impl Severity {
    /// All severities, in the order their queues are created.
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Error];

    /// Single-letter code written on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Severity::Info => "i",
            Severity::Warning => "w",
            Severity::Error => "e",
        }
    }

    /// Lowercase name used in metrics labels and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry shipped to the collector.
///
/// Built once per log call and consumed by the relay worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub id: Uuid,
    pub severity: Severity,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub application: String,
    pub content: Value,
}

impl LogMessage {
    /// Build a message with a fresh ID and the current time.
    pub fn new(severity: Severity, application: impl Into<String>, content: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            timestamp: unix_now(),
            application: application.into(),
            content,
        }
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

//! Structured error model.
//!
//! # Data Flow
//! ```text
//! fault detected (leaf error, e.g. io::Error)
//!     → Error::wrap("db timeout", leaf)          structured, no code
//!     → HttpError::wrap(500, "internal", err)    HTTP-facing
//!     → propagated with `?` to the handler boundary
//!     → HttpError::respond / IntoResponse        JSON body + warning entry
//! ```
//!
//! # Design Decisions
//! - Causes are owned (`Box`), so chains cannot form cycles
//! - Rendering walks the chain with `downcast_ref`, so any error type can
//!   appear as a leaf
//! - Only the top-level code and message are meant for end users; causes
//!   are diagnostic detail

pub mod http;

use serde_json::{json, Value};
use thiserror::Error as ThisError;

pub use http::{HttpError, InvalidStatusCode};

/// Boxed error used as a cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error with a message and an optional wrapped cause.
#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct Error {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap `cause` with additional context.
    pub fn wrap(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The immediately wrapped error.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        as_dyn(&self.cause)
    }
}

pub(crate) fn as_dyn(cause: &Option<BoxError>) -> Option<&(dyn std::error::Error + 'static)> {
    cause
        .as_deref()
        .map(|e| e as &(dyn std::error::Error + 'static))
}

/// Render a cause chain as JSON.
///
/// `HttpError` → `{code, message, cause}`, [`Error`] → `{message, cause}`,
/// any other error → its message string, no cause → `null`.
pub fn cause_to_json(cause: Option<&(dyn std::error::Error + 'static)>) -> Value {
    let Some(err) = cause else {
        return Value::Null;
    };
    if let Some(http) = err.downcast_ref::<HttpError>() {
        json!({
            "code": http.code(),
            "message": http.message(),
            "cause": cause_to_json(http.cause()),
        })
    } else if let Some(structured) = err.downcast_ref::<Error>() {
        json!({
            "message": structured.message(),
            "cause": cause_to_json(structured.cause()),
        })
    } else {
        Value::String(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_wrap_exposes_cause() {
        let err = Error::wrap("db timeout", io::Error::other("connection refused"));
        assert_eq!(err.to_string(), "db timeout");
        assert_eq!(err.cause().unwrap().to_string(), "connection refused");
        assert!(err.source().is_some());
        assert!(Error::new("plain").cause().is_none());
    }

    #[test]
    fn test_cause_to_json_shapes() {
        assert_eq!(cause_to_json(None), Value::Null);

        let leaf = io::Error::other("connection refused");
        assert_eq!(cause_to_json(Some(&leaf)), json!("connection refused"));

        let plain = Error::wrap("db timeout", leaf);
        assert_eq!(
            cause_to_json(Some(&plain)),
            json!({"message": "db timeout", "cause": "connection refused"})
        );

        let string_cause = Error::wrap("bad input", "field `name` missing");
        assert_eq!(
            cause_to_json(Some(&string_cause)),
            json!({"message": "bad input", "cause": "field `name` missing"})
        );
    }
}

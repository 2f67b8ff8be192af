//! HTTP-facing errors.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use thiserror::Error;

use super::{as_dyn, cause_to_json, BoxError};
use crate::codec::Severity;
use crate::logger::{facade, LogError, Logger};

/// Content type of rendered error bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Returned when an error is built with a non-error status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("status code {0} does not indicate an error")]
pub struct InvalidStatusCode(pub u16);

/// A structured error carrying the status code sent to the client.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpError {
    code: StatusCode,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl HttpError {
    /// Build an error. `code` must be a valid status of at least 400.
    pub fn new(
        code: u16,
        message: impl Into<String>,
        cause: Option<BoxError>,
    ) -> Result<Self, InvalidStatusCode> {
        if code < 400 {
            return Err(InvalidStatusCode(code));
        }
        let code = StatusCode::from_u16(code).map_err(|_| InvalidStatusCode(code))?;
        Ok(Self::with_status(code, message, cause))
    }

    /// Build an error wrapping `cause`.
    pub fn wrap(
        code: u16,
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Result<Self, InvalidStatusCode> {
        Self::new(code, message, Some(cause.into()))
    }

    fn with_status(code: StatusCode, message: impl Into<String>, cause: Option<BoxError>) -> Self {
        Self {
            code,
            message: message.into(),
            cause,
        }
    }

    /// 404 without a cause.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, message, None)
    }

    /// 500 wrapping `cause`.
    pub fn internal(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, message, Some(cause.into()))
    }

    /// 503 without a cause.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::SERVICE_UNAVAILABLE, message, None)
    }

    pub fn code(&self) -> u16 {
        self.code.as_u16()
    }

    pub fn status(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The immediately wrapped error.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        as_dyn(&self.cause)
    }

    /// The response body: `{"error": {"code", "message", "cause"}}`.
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code(),
                "message": self.message,
                "cause": cause_to_json(self.cause()),
            }
        })
    }

    /// Render the response and log the fault through `logger`.
    pub fn respond(&self, logger: &Logger) -> Response {
        self.render(|severity, content| logger.log(severity, content))
    }

    fn render<F>(&self, log: F) -> Response
    where
        F: FnOnce(Severity, Value) -> Result<(), LogError>,
    {
        let (body, logged) = match serde_json::to_vec(&self.to_json()) {
            Ok(bytes) => {
                let entry = format!(
                    "status {} occurred with message {}",
                    self.code(),
                    self.message
                );
                (Body::from(bytes), log(Severity::Warning, Value::String(entry)))
            }
            Err(err) => (Body::empty(), log(Severity::Error, Value::String(err.to_string()))),
        };

        if let Err(err) = logged {
            tracing::error!(
                code = self.code(),
                message = %self.message,
                error = %err,
                "failed to log HTTP error"
            );
        }

        let mut response = Response::new(body);
        *response.status_mut() = self.code;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
        response
    }
}

/// Renders like [`HttpError::respond`], logging through the global facade.
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.render(|severity, content| facade::global()?.log(severity, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::relay::LogSink;
    use crate::codec::LogMessage;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Collect(Arc<Mutex<Vec<LogMessage>>>);

    impl LogSink for Collect {
        fn deliver(&self, message: LogMessage) {
            self.0.lock().push(message);
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_rejects_non_error_codes() {
        assert_eq!(
            HttpError::new(399, "fine", None).unwrap_err(),
            InvalidStatusCode(399)
        );
        assert_eq!(
            HttpError::new(200, "ok", None).unwrap_err(),
            InvalidStatusCode(200)
        );
        assert_eq!(
            HttpError::new(1000, "huge", None).unwrap_err(),
            InvalidStatusCode(1000)
        );
        assert!(HttpError::new(400, "bad", None).is_ok());
    }

    #[test]
    fn test_shorthand_constructors() {
        assert_eq!(HttpError::not_found("x").code(), 404);
        assert_eq!(HttpError::unavailable("x").code(), 503);
        let err = HttpError::internal("x", "root cause");
        assert_eq!(err.code(), 500);
        assert_eq!(err.cause().unwrap().to_string(), "root cause");
    }

    #[test]
    fn test_not_found_body() {
        let err = HttpError::new(404, "no such item", None).unwrap();
        assert_eq!(
            err.to_json(),
            json!({"error": {"code": 404, "message": "no such item", "cause": null}})
        );
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_three_level_chain() {
        let leaf = io::Error::other("connection refused");
        let plain = Error::wrap("db timeout", leaf);
        let err = HttpError::wrap(500, "internal", plain).unwrap();

        assert_eq!(
            err.to_json(),
            json!({
                "error": {
                    "code": 500,
                    "message": "internal",
                    "cause": {
                        "message": "db timeout",
                        "cause": "connection refused",
                    },
                }
            })
        );
    }

    #[test]
    fn test_nested_http_error_keeps_code() {
        let upstream = HttpError::new(503, "upstream unavailable", None).unwrap();
        let err = HttpError::wrap(502, "bad gateway", upstream).unwrap();

        assert_eq!(
            err.to_json()["error"]["cause"],
            json!({"code": 503, "message": "upstream unavailable", "cause": null})
        );
    }

    #[tokio::test]
    async fn test_respond_sets_status_and_logs_warning() {
        let sink = Collect::default();
        let logger = Logger::builder("api").sink(sink.clone()).build().unwrap();

        let err = HttpError::new(404, "no such item", None).unwrap();
        let response = err.respond(&logger);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            JSON_CONTENT_TYPE
        );
        assert_eq!(
            body_json(response).await,
            json!({"error": {"code": 404, "message": "no such item", "cause": null}})
        );

        assert!(logger.flush(Duration::from_secs(5)));
        let logged = sink.0.lock();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].severity, Severity::Warning);
        assert_eq!(
            logged[0].content,
            json!("status 404 occurred with message no such item")
        );
    }
}

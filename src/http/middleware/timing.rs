//! Request timing middleware.
//!
//! Emits one info entry per request after the inner handler returns:
//! `{"method", "requestUri", "remoteAddress", "duration"}` with the
//! duration in nanoseconds. The request and response pass through untouched.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::logger::Logger;

/// Use with `axum::middleware::from_fn_with_state(logger, request_timing)`.
pub async fn request_timing(
    State(logger): State<Logger>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let request_uri = request.uri().to_string();
    let remote_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let entry = json!({
        "method": method,
        "requestUri": request_uri,
        "remoteAddress": remote_address,
        "duration": elapsed.as_nanos() as u64,
    });
    if let Err(err) = logger.info(entry) {
        tracing::warn!(error = %err, method = %method, uri = %request_uri, "failed to log request timing");
    }

    response
}

//! Demo HTTP server.
//!
//! # Responsibilities
//! - Create the Axum Router with the demo handlers
//! - Wire up middleware (request timing, tracing)
//! - Ship entries posted to `/log` through the relay
//! - Show the error model on `/items/{id}`
//! - Drain the relay on graceful shutdown

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::codec::Severity;
use crate::error::{Error, HttpError};
use crate::http::middleware::request_timing;
use crate::logger::{LogError, Logger};
use crate::relay::RelayError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub logger: Logger,
}

/// HTTP server fronting a [`Logger`].
pub struct HttpServer {
    router: Router,
    logger: Logger,
}

impl HttpServer {
    pub fn new(logger: Logger) -> Self {
        let router = build_router(logger.clone());
        Self { router, logger }
    }

    /// Run until `shutdown` resolves, then drain the relay.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        let logger = self.logger;
        tokio::task::spawn_blocking(move || logger.shutdown())
            .await
            .map_err(std::io::Error::other)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the router with all middleware layers.
pub fn build_router(logger: Logger) -> Router {
    let state = AppState {
        logger: logger.clone(),
    };
    Router::new()
        .route("/health", get(health))
        .route("/log", post(ship_entry))
        .route("/items/{id}", get(get_item))
        .with_state(state)
        .layer(middleware::from_fn_with_state(logger, request_timing))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Body accepted by `POST /log`.
#[derive(Debug, Deserialize)]
pub struct ShipRequest {
    pub severity: Severity,
    pub content: Value,
}

async fn ship_entry(State(state): State<AppState>, Json(req): Json<ShipRequest>) -> Response {
    match state.logger.try_log(req.severity, req.content) {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(LogError::Relay(RelayError::Full(severity))) => {
            HttpError::unavailable(format!("{severity} queue is full")).respond(&state.logger)
        }
        Err(err) => HttpError::internal("failed to queue log entry", err).respond(&state.logger),
    }
}

async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match lookup_item(&id) {
        Ok(item) => Json(item).into_response(),
        Err(err) => err.respond(&state.logger),
    }
}

/// Fixed lookup that fails in each of the ways the error model renders.
fn lookup_item(id: &str) -> Result<Value, HttpError> {
    match id {
        "missing" => Err(HttpError::not_found(format!("item {id} not found"))),
        "broken" => {
            let leaf = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
            Err(HttpError::internal("internal", Error::wrap("db timeout", leaf)))
        }
        _ => Ok(json!({"id": id, "name": format!("item {id}")})),
    }
}

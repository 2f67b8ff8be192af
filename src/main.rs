//! log-relay demo server.
//!
//! Serves a small Axum app whose request timings and errors are shipped
//! through the relay.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ TraceLayer ──▶ request_timing ──▶ handler
//!                                   │               │
//!                                   │ info entry    │ HttpError::respond
//!                                   ▼               ▼ warning entry
//!                             ┌──────────────────────────────┐
//!                             │ Logger → Relay (i / w / e)   │
//!                             │          │ worker thread     │
//!                             │          ▼                   │
//!                             │   stdout line + POST         │──▶ Collector
//!                             └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use log_relay::config::{apply_env, read_config, validate_config, Config, ConfigError};
use log_relay::http::HttpServer;
use log_relay::lifecycle::shutdown_signal;
use log_relay::logger::facade;
use log_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "log-relay")]
#[command(about = "Demo server shipping its request logs to a collector", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application label stamped on every entry.
    #[arg(short, long)]
    application: Option<String>,

    /// Collector endpoint; empty disables network delivery.
    #[arg(long)]
    collector_url: Option<String>,

    /// Address to serve on.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => {
            let mut config = Config::default();
            apply_env(&mut config, |key| std::env::var(key).ok())?;
            config
        }
    };

    if let Some(application) = &cli.application {
        config.logger.application = application.clone();
    }
    if let Some(url) = &cli.collector_url {
        config.logger.collector_url = Some(url.clone());
    }
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_tracing(&config.observability.log_filter);
    tracing::info!("log-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        application = %config.logger.application,
        collector_url = ?config.logger.collector_url,
        queue_capacity = config.logger.queue_capacity,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let logger = facade::init(config.logger.clone())?;
    logger.info(format!("{} started", config.logger.application))?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(logger).run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

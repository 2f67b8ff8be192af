//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay, logger, middleware produce:
//!     → logging.rs (tracing subscriber for internal diagnostics)
//!     → metrics.rs (enqueue / delivery counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Shipped entries and internal diagnostics are separate streams: entries
//!   go through the relay, diagnostics through `tracing`
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

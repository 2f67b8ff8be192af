//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! request
//!     → TraceLayer (tower-http spans)
//!     → middleware/timing.rs (start clock)
//!     → handler (may fail with HttpError → respond)
//!     → middleware/timing.rs (info entry with duration)
//!     → response
//! ```

pub mod middleware;
pub mod server;

pub use middleware::request_timing;
pub use server::{build_router, AppState, HttpServer};

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Start relay → Bind listener → Serve
//!
//! Shutdown (signals.rs):
//!     Signal received → Stop accepting → Drain relay → Exit
//! ```
//!
//! # Design Decisions
//! - The relay is drained after the server stops, so entries emitted by
//!   in-flight requests are still delivered

pub mod signals;

pub use signals::shutdown_signal;

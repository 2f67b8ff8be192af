//! Log record codec.
//!
//! # Responsibilities
//! - Define the shape of a shipped log entry
//! - Serialize entries to the JSON wire format used by the collector
//!
//! # Wire Format
//! ```text
//! {"id":"<uuid v4>","severity":"i|w|e","timestamp":<unix secs>,
//!  "application":"<label>","content":<any JSON value>}
//! ```

pub mod message;

pub use message::{LogMessage, Severity};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (LOG_APPLICATION, LOG_SERVICE_URL, LOG_LEVEL)
//!     → validation.rs (semantic checks)
//!     → Config (validated)
//!     → LoggerConfig handed to Logger / facade
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Environment wins over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env, load_config, read_config, ConfigError};
pub use schema::{Config, ConsoleMode, LoggerConfig, ObservabilityConfig, ServerConfig};
pub use validation::{validate_config, ValidationError};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (CADDY_API, CADDYFILE_PATH, ...)
//!     → validation.rs (semantic checks)
//!     → EditorConfig (validated, immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults except the control API URL
//! - Environment wins over the file
//! - Validation reports every problem at once

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ControlApiConfig, EditorConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    StorageConfig,
};
pub use validation::ValidationError;

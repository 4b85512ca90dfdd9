//! Caddyfile editor library.
//!
//! A small HTTP front-end over a single Caddyfile: read it, validate
//! candidates against the Caddy control API, and hot-reload updates.

// Core subsystems
pub mod config;
pub mod control;
pub mod http;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::EditorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

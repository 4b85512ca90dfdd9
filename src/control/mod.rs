//! Control API subsystem.
//!
//! # Data Flow
//! ```text
//! validate handler → client.adapt() → POST {CADDY_API}/adapt
//! update handler   → client.load()  → POST {CADDY_API}/load
//! ```
//!
//! # Design Decisions
//! - One shared `reqwest::Client` with connect and total timeouts
//! - No retries; a failed call is reported to the caller as-is
//! - Error bodies are bounded before they are echoed back

pub mod client;

pub use client::{
    ControlApiClient, ControlApiError, ControlEndpoint, ControlResponse, CADDYFILE_CONTENT_TYPE,
};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, store, control client produce:
//!     → logging.rs (structured log events, request IDs via spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;

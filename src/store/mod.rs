//! Configuration storage subsystem.
//!
//! # Data Flow
//! ```text
//! startup:  bootstrap() → create empty file if missing
//! read:     read() → bytes straight from disk
//! update:   lock_for_update() → stage() → [control API accepts] → commit()
//!                                       → [control API rejects] → drop (no change)
//! ```

pub mod caddyfile;

pub use caddyfile::{BootstrapOutcome, CaddyfileStore, StagedCaddyfile, StoreError, UpdatePermit};

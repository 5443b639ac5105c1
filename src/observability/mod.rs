//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! reconcile::builder   → metrics::record_restart_trigger
//! reconcile::detector  → metrics::record_detection
//! reconcile::cycle     → metrics::record_cycle
//! every component      → tracing events (instance label + field names)
//!
//! Consumers:
//!     → Log output (stderr, filtered by RUST_LOG / [observability].log_level)
//!     → Whatever `metrics` recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics recorder; without one, the
//!   `metrics` macros are no-ops
//! - `metrics_enabled = false` suppresses recording entirely

pub mod logging;
pub mod metrics;

//! Reconciliation core.
//!
//! # Data Flow
//! ```text
//! LiveSnapshot ──flatten.rs──▶ baseline DesiredConfig
//!                                  │
//! DesiredConfig ──builder.rs───────┴──▶ UpdateRequest + RestartRequirement
//!                   │   ├─ changes.rs      (old/new values, registry defaults)
//!                   │   ├─ restart.rs      (per-field restart classification)
//!                   │   └─ extra_config.rs (shared-map delta with tombstones)
//!                   ▼
//!            detector.rs (no-op request vs candidate request)
//!                   ▼
//!            cycle.rs (store → detect → apply → persist)
//! ```
//!
//! # Design Decisions
//! - Every component borrows the immutable `FieldRegistry`; no state is
//!   shared between calls
//! - Failures are typed `ReconcileError`s returned to the caller; nothing is
//!   retried or repaired here

pub mod builder;
pub mod changes;
pub mod cycle;
pub mod detector;
pub mod error;
pub mod extra_config;
pub mod flatten;
pub mod restart;

pub use builder::{BuildOutput, RequestBuilder};
pub use changes::FieldChanges;
pub use cycle::{CycleError, CycleOutcome, Reconciler};
pub use detector::{ChangeDetector, ChangeReport};
pub use error::{ReconcileError, ReconcileResult};
pub use flatten::SnapshotMapper;
pub use restart::{Classified, HotPlug, RestartRequirement};
